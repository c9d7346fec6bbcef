//! Journal entry domain types.

use chrono::NaiveDate;
use costbook_shared::types::{
    AccountId, Currency, FiscalYearId, JournalEntryId, SourceEventId, TenantId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::account::AccountRole;

/// Entry status. The generator always emits drafts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Generated, not yet posted.
    Draft,
    /// Posted to the general ledger (immutable).
    Posted,
    /// Voided (immutable).
    Voided,
}

impl EntryStatus {
    /// Returns true if the entry is immutable.
    #[must_use]
    pub fn is_immutable(&self) -> bool {
        matches!(self, Self::Posted | Self::Voided)
    }
}

/// A single debit or credit line.
///
/// Exactly one of `debit` and `credit` is non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// 1-based position within the entry.
    pub line_number: u32,
    /// The account posted to.
    pub account_id: AccountId,
    /// The account code at generation time.
    pub account_code: String,
    /// Role the account plays on this line.
    pub role: AccountRole,
    /// Debit amount, reporting currency.
    pub debit: Decimal,
    /// Credit amount, reporting currency.
    pub credit: Decimal,
    /// What the line records ("realized gain", "fee expense", ...).
    pub description: String,
}

impl JournalLine {
    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// A balanced double-entry record generated from one source event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: JournalEntryId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Fiscal year the entry is booked in.
    pub fiscal_year_id: FiscalYearId,
    /// Event the entry was generated from.
    pub source_event_id: SourceEventId,
    /// Booking date.
    pub date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// Reporting currency of every line.
    pub currency: Currency,
    /// Status.
    pub status: EntryStatus,
    /// Ordered lines.
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    /// Sum of debits.
    #[must_use]
    pub fn total_debit(&self) -> Decimal {
        self.lines.iter().map(|l| l.debit).sum()
    }

    /// Sum of credits.
    #[must_use]
    pub fn total_credit(&self) -> Decimal {
        self.lines.iter().map(|l| l.credit).sum()
    }

    /// Lines posted to accounts of a role.
    pub fn lines_for(&self, role: AccountRole) -> impl Iterator<Item = &JournalLine> {
        self.lines.iter().filter(move |l| l.role == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_status_immutable() {
        assert!(!EntryStatus::Draft.is_immutable());
        assert!(EntryStatus::Posted.is_immutable());
        assert!(EntryStatus::Voided.is_immutable());
    }
}
