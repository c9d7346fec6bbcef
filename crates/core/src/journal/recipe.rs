//! Journal recipes, one per movement kind.
//!
//! Recipes work on roles, not accounts: [`draft_lines`] decides the debit
//! and credit legs, [`bind_lines`] attaches the tenant's resolved accounts.
//! Every amount is rounded to the reporting scale before any leg is derived
//! from it, so gain and total legs balance exactly.

use std::collections::BTreeSet;

use costbook_shared::types::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::JournalLine;
use super::error::JournalError;
use super::event::{AssetLeg, Fee, MovementEvent, MovementKind};
use crate::account::{AccountRole, AccountSet};

/// A journal line before account resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftLine {
    /// Role of the account to post to.
    pub role: AccountRole,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Line description.
    pub description: String,
}

struct Drafts {
    currency: Currency,
    lines: Vec<DraftLine>,
}

impl Drafts {
    fn new(currency: Currency) -> Self {
        Self {
            currency,
            lines: Vec::new(),
        }
    }

    fn round(&self, amount: Decimal) -> Decimal {
        self.currency.round(amount)
    }

    fn debit(&mut self, role: AccountRole, amount: Decimal, description: &str) {
        self.push(role, amount, Decimal::ZERO, description);
    }

    fn credit(&mut self, role: AccountRole, amount: Decimal, description: &str) {
        self.push(role, Decimal::ZERO, amount, description);
    }

    // Zero-amount lines are omitted.
    fn push(&mut self, role: AccountRole, debit: Decimal, credit: Decimal, description: &str) {
        if debit.is_zero() && credit.is_zero() {
            return;
        }
        self.lines.push(DraftLine {
            role,
            debit,
            credit,
            description: description.to_string(),
        });
    }

    /// Dr fee expense / Cr `paid_from`.
    fn fee(&mut self, fee: Decimal, paid_from: AccountRole) {
        self.debit(AccountRole::FeeExpense, fee, "fee expense");
        self.credit(paid_from, fee, "fee paid");
    }

    /// Gain or loss leg of a disposal. Never both.
    fn realized(&mut self, proceeds: Decimal, cost_basis: Decimal) {
        let gain = proceeds - cost_basis;
        if gain > Decimal::ZERO {
            self.credit(AccountRole::RealizedGain, gain, "realized gain");
        } else if gain < Decimal::ZERO {
            self.debit(AccountRole::RealizedLoss, -gain, "realized loss");
        }
    }
}

/// Builds the role-level lines for an event.
///
/// `cost_basis` is the FIFO cost of the disposed leg; it is ignored by
/// kinds without one.
#[must_use]
pub fn draft_lines(
    event: &MovementEvent,
    cost_basis: Decimal,
    currency: Currency,
) -> Vec<DraftLine> {
    let mut drafts = Drafts::new(currency);
    let fee = drafts.round(event.fee.as_ref().map_or(Decimal::ZERO, |f: &Fee| f.value));

    match &event.kind {
        MovementKind::Acquisition { leg } => acquisition(&mut drafts, leg, fee),
        MovementKind::Disposal { leg } => disposal(&mut drafts, leg, cost_basis, fee),
        MovementKind::Swap { incoming, .. } => swap(&mut drafts, incoming, cost_basis, fee),
        MovementKind::Reward { leg } => reward(&mut drafts, leg, fee),
        MovementKind::Stake { .. } | MovementKind::Unstake { .. } => {
            drafts.fee(fee, AccountRole::Wallet);
        }
    }

    drafts.lines
}

/// Dr wallet value; Dr fee expense; Cr bank value + fee.
fn acquisition(drafts: &mut Drafts, leg: &AssetLeg, fee: Decimal) {
    let value = drafts.round(leg.value);
    drafts.debit(AccountRole::Wallet, value, "asset acquired");
    drafts.debit(AccountRole::FeeExpense, fee, "fee expense");
    drafts.credit(AccountRole::Bank, value + fee, "payment");
}

/// Dr bank proceeds; Dr loss; Dr fee; Cr wallet cost basis; Cr gain; Cr wallet fee.
fn disposal(drafts: &mut Drafts, leg: &AssetLeg, cost_basis: Decimal, fee: Decimal) {
    let proceeds = drafts.round(leg.value);
    let cost_basis = drafts.round(cost_basis);

    drafts.debit(AccountRole::Bank, proceeds, "disposal proceeds");
    drafts.credit(AccountRole::Wallet, cost_basis, "cost basis disposed");
    drafts.realized(proceeds, cost_basis);
    drafts.fee(fee, AccountRole::Wallet);
}

/// Like a disposal, with the incoming asset in place of the bank.
fn swap(drafts: &mut Drafts, incoming: &AssetLeg, cost_basis: Decimal, fee: Decimal) {
    let proceeds = drafts.round(incoming.value);
    let cost_basis = drafts.round(cost_basis);

    drafts.debit(AccountRole::Wallet, proceeds, "asset received");
    drafts.credit(AccountRole::Wallet, cost_basis, "cost basis disposed");
    drafts.realized(proceeds, cost_basis);
    drafts.fee(fee, AccountRole::Wallet);
}

fn reward(drafts: &mut Drafts, leg: &AssetLeg, fee: Decimal) {
    let value = drafts.round(leg.value);
    drafts.debit(AccountRole::Wallet, value, "reward received");
    drafts.credit(AccountRole::OtherIncome, value, "reward income");
    drafts.fee(fee, AccountRole::Wallet);
}

/// Roles the drafts post to.
#[must_use]
pub fn required_roles(drafts: &[DraftLine]) -> BTreeSet<AccountRole> {
    drafts.iter().map(|d| d.role).collect()
}

/// Attaches resolved accounts and line numbers.
///
/// Debits come first, then credits, each in recipe order.
pub fn bind_lines(
    drafts: Vec<DraftLine>,
    accounts: &AccountSet,
) -> Result<Vec<JournalLine>, JournalError> {
    let (debits, credits): (Vec<_>, Vec<_>) = drafts.into_iter().partition(|d| !d.debit.is_zero());

    debits
        .into_iter()
        .chain(credits)
        .zip(1u32..)
        .map(|(draft, line_number)| {
            let account = accounts
                .get(draft.role)
                .ok_or_else(|| JournalError::AccountUnavailable {
                    role: draft.role,
                    reason: "not resolved for this event".to_string(),
                })?;
            Ok(JournalLine {
                line_number,
                account_id: account.id,
                account_code: account.code.clone(),
                role: draft.role,
                debit: draft.debit,
                credit: draft.credit,
                description: draft.description,
            })
        })
        .collect()
}
