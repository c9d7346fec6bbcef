//! Balance and idempotency guard.
//!
//! Every generated entry passes [`verify_balanced`] before it can be
//! committed, and every generation starts by asking the
//! [`IdempotencyGuard`] whether the source event was already booked.

use std::sync::Arc;

use costbook_shared::types::{SourceEventId, TenantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::journal::{JournalEntry, JournalError, JournalLine};
use crate::repository::{LedgerRepository, RepositoryError};

/// Debit and credit totals of a set of lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryTotals {
    /// Total debits.
    pub debit: Decimal,
    /// Total credits.
    pub credit: Decimal,
    /// Whether debits equal credits.
    pub is_balanced: bool,
}

impl EntryTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub fn new(debit: Decimal, credit: Decimal) -> Self {
        Self {
            debit,
            credit,
            is_balanced: debit == credit,
        }
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// Checks that lines are well-formed and balanced.
///
/// A line must carry a non-negative amount on exactly one side. An empty
/// set of lines is balanced.
pub fn verify_balanced(lines: &[JournalLine]) -> Result<EntryTotals, JournalError> {
    let mut debit = Decimal::ZERO;
    let mut credit = Decimal::ZERO;

    for line in lines {
        let negative = line.debit < Decimal::ZERO || line.credit < Decimal::ZERO;
        let one_sided = line.debit.is_zero() != line.credit.is_zero();
        if negative || !one_sided {
            error!(line_number = line.line_number, "Malformed journal line generated");
            return Err(JournalError::MalformedLine(line.line_number));
        }
        debit += line.debit;
        credit += line.credit;
    }

    let totals = EntryTotals::new(debit, credit);
    if !totals.is_balanced {
        error!(
            debit = %debit,
            credit = %credit,
            difference = %totals.difference(),
            "Generated journal entry does not balance"
        );
        return Err(JournalError::Unbalanced { debit, credit });
    }

    Ok(totals)
}

/// Finds entries already generated for a source event.
pub struct IdempotencyGuard<R: LedgerRepository> {
    repo: Arc<R>,
}

impl<R: LedgerRepository> IdempotencyGuard<R> {
    /// Create a new guard.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Returns the entry already booked for `(tenant, source)`, if any.
    pub async fn existing(
        &self,
        tenant_id: TenantId,
        source_event_id: &SourceEventId,
    ) -> Result<Option<JournalEntry>, RepositoryError> {
        self.repo.find_entry_by_source(tenant_id, source_event_id).await
    }
}
