//! Account domain types.

use std::collections::BTreeMap;

use costbook_shared::types::{AccountId, TenantId};
use serde::{Deserialize, Serialize};

/// Semantic role an account plays in the generated entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Digital asset holdings.
    Wallet,
    /// Fiat bank account.
    Bank,
    /// Realized gains on disposal.
    RealizedGain,
    /// Realized losses on disposal.
    RealizedLoss,
    /// Network and exchange fees.
    FeeExpense,
    /// Staking rewards, airdrops, mining income.
    OtherIncome,
}

/// Account classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Asset account (debit normal).
    Asset,
    /// Expense account (debit normal).
    Expense,
    /// Revenue account (credit normal).
    Revenue,
}

impl AccountRole {
    /// All roles, in the order recipes list them.
    pub const ALL: [Self; 6] = [
        Self::Wallet,
        Self::Bank,
        Self::RealizedGain,
        Self::RealizedLoss,
        Self::FeeExpense,
        Self::OtherIncome,
    ];

    /// Code of the system account created for this role.
    #[must_use]
    pub const fn system_code(self) -> &'static str {
        match self {
            Self::Wallet => "5700",
            Self::Bank => "572",
            Self::RealizedGain => "7688",
            Self::RealizedLoss => "6688",
            Self::FeeExpense => "6627",
            Self::OtherIncome => "7691",
        }
    }

    /// Name of the system account created for this role.
    #[must_use]
    pub const fn system_name(self) -> &'static str {
        match self {
            Self::Wallet => "Crypto Wallets",
            Self::Bank => "Banks",
            Self::RealizedGain => "Crypto Exchange Gains",
            Self::RealizedLoss => "Crypto Exchange Losses",
            Self::FeeExpense => "Crypto Transaction Fees",
            Self::OtherIncome => "Staking Rewards",
        }
    }

    /// Account type of the system account for this role.
    #[must_use]
    pub const fn account_type(self) -> AccountType {
        match self {
            Self::Wallet | Self::Bank => AccountType::Asset,
            Self::RealizedLoss | Self::FeeExpense => AccountType::Expense,
            Self::RealizedGain | Self::OtherIncome => AccountType::Revenue,
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Wallet => "wallet",
            Self::Bank => "bank",
            Self::RealizedGain => "realized_gain",
            Self::RealizedLoss => "realized_loss",
            Self::FeeExpense => "fee_expense",
            Self::OtherIncome => "other_income",
        };
        f.write_str(s)
    }
}

/// A node of a tenant's chart of accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Stable account code (e.g., "5700").
    pub code: String,
    /// Display name.
    pub name: String,
    /// Role this account is tagged with.
    pub role: AccountRole,
    /// Classification.
    pub account_type: AccountType,
    /// Created by the engine rather than by the tenant.
    pub is_system: bool,
}

impl Account {
    /// Builds the system account for a role.
    ///
    /// The id is derived from (tenant, role), so independent builds agree.
    #[must_use]
    pub fn system(tenant_id: TenantId, role: AccountRole) -> Self {
        Self {
            id: AccountId::for_system(tenant_id, &role.to_string()),
            tenant_id,
            code: role.system_code().to_string(),
            name: role.system_name().to_string(),
            role,
            account_type: role.account_type(),
            is_system: true,
        }
    }
}

/// Accounts resolved for one event, keyed by role.
#[derive(Debug, Clone, Default)]
pub struct AccountSet {
    accounts: BTreeMap<AccountRole, Account>,
}

impl AccountSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the account for its role.
    pub fn insert(&mut self, account: Account) {
        self.accounts.insert(account.role, account);
    }

    /// Returns the account resolved for a role.
    #[must_use]
    pub fn get(&self, role: AccountRole) -> Option<&Account> {
        self.accounts.get(&role)
    }

    /// Number of resolved roles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true if no role is resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl FromIterator<Account> for AccountSet {
    fn from_iter<T: IntoIterator<Item = Account>>(iter: T) -> Self {
        let mut set = Self::new();
        for account in iter {
            set.insert(account);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AccountRole::Wallet, "5700", AccountType::Asset)]
    #[case(AccountRole::Bank, "572", AccountType::Asset)]
    #[case(AccountRole::RealizedGain, "7688", AccountType::Revenue)]
    #[case(AccountRole::RealizedLoss, "6688", AccountType::Expense)]
    #[case(AccountRole::FeeExpense, "6627", AccountType::Expense)]
    #[case(AccountRole::OtherIncome, "7691", AccountType::Revenue)]
    fn test_system_account_defaults(
        #[case] role: AccountRole,
        #[case] code: &str,
        #[case] account_type: AccountType,
    ) {
        let tenant = TenantId::new();
        let account = Account::system(tenant, role);
        assert_eq!(account.code, code);
        assert_eq!(account.account_type, account_type);
        assert_eq!(account.tenant_id, tenant);
        assert!(account.is_system);
        assert_eq!(account.id, Account::system(tenant, role).id);
    }

    #[test]
    fn test_system_codes_are_unique() {
        let mut codes: Vec<_> = AccountRole::ALL.iter().map(|r| r.system_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), AccountRole::ALL.len());
    }

    #[test]
    fn test_account_set_lookup() {
        let tenant = TenantId::new();
        let set: AccountSet = [AccountRole::Wallet, AccountRole::Bank]
            .into_iter()
            .map(|role| Account::system(tenant, role))
            .collect();

        assert_eq!(set.len(), 2);
        assert_eq!(
            set.get(AccountRole::Bank).map(|a| a.code.as_str()),
            Some("572")
        );
        assert!(set.get(AccountRole::RealizedGain).is_none());
    }
}
