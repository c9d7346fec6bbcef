//! Account resolver service.

use std::sync::Arc;

use costbook_shared::types::TenantId;
use tracing::debug;

use super::types::{Account, AccountRole};
use crate::repository::{LedgerRepository, RepositoryError};

/// Outcome of resolving one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedAccount {
    /// The tenant already has an account for the role.
    Existing(Account),
    /// The system account to create together with the entry that needs it.
    Planned(Account),
}

impl ResolvedAccount {
    /// The account, regardless of outcome.
    #[must_use]
    pub fn account(&self) -> &Account {
        match self {
            Self::Existing(account) | Self::Planned(account) => account,
        }
    }
}

/// Maps account roles to a tenant's concrete accounts.
///
/// Resolution never writes. A missing system account is returned as
/// [`ResolvedAccount::Planned`] and stored by the commit that uses it.
pub struct AccountResolver<R: LedgerRepository> {
    repo: Arc<R>,
}

impl<R: LedgerRepository> AccountResolver<R> {
    /// Create a new account resolver.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Resolve the account for a role.
    ///
    /// Planned system accounts carry an id derived from (tenant, role), so
    /// concurrent first uses plan the same account.
    pub async fn resolve(
        &self,
        tenant_id: TenantId,
        role: AccountRole,
    ) -> Result<ResolvedAccount, RepositoryError> {
        if let Some(account) = self.repo.find_account_by_role(tenant_id, role).await? {
            debug!(tenant_id = %tenant_id, role = %role, code = %account.code, "Account resolved");
            return Ok(ResolvedAccount::Existing(account));
        }

        let account = Account::system(tenant_id, role);
        debug!(
            tenant_id = %tenant_id,
            role = %role,
            code = %account.code,
            "System account planned"
        );
        Ok(ResolvedAccount::Planned(account))
    }
}
