//! Journal generation error types.

use chrono::NaiveDate;
use costbook_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::account::AccountRole;
use crate::disposal::DisposalError;
use crate::failure::FailureKind;
use crate::lot::LotError;
use crate::repository::RepositoryError;

/// Errors that can occur while turning an event into a journal entry.
#[derive(Debug, Error)]
pub enum JournalError {
    // ========== Validation Errors ==========
    /// A quantity on the event is negative.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(Decimal),

    /// A fiat value on the event is negative.
    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    /// The event is structurally unusable.
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    // ========== Configuration Errors ==========
    /// No open fiscal year covers the event date.
    #[error("No open fiscal period for date {0}")]
    NoOpenPeriod(NaiveDate),

    /// A system account could not be resolved or created.
    #[error("Account for role {role} unavailable: {reason}")]
    AccountUnavailable {
        /// The role.
        role: AccountRole,
        /// Why resolution failed.
        reason: String,
    },

    // ========== Consistency Errors ==========
    /// Generated lines do not balance.
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    Unbalanced {
        /// Total debits.
        debit: Decimal,
        /// Total credits.
        credit: Decimal,
    },

    /// A generated line carries a negative amount or both sides.
    #[error("Journal line {0} is malformed")]
    MalformedLine(u32),

    // ========== Nested Errors ==========
    /// Lot failure.
    #[error(transparent)]
    Lot(#[from] LotError),

    /// Disposal failure.
    #[error(transparent)]
    Disposal(#[from] DisposalError),

    /// Repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl JournalError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidQuantity(_) => "INVALID_QUANTITY",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InvalidEvent(_) => "INVALID_EVENT",
            Self::NoOpenPeriod(_) => "NO_OPEN_PERIOD",
            Self::AccountUnavailable { .. } => "ACCOUNT_UNAVAILABLE",
            Self::Unbalanced { .. } => "UNBALANCED_ENTRY",
            Self::MalformedLine(_) => "MALFORMED_LINE",
            Self::Lot(err) => err.error_code(),
            Self::Disposal(err) => err.error_code(),
            Self::Repository(err) => err.error_code(),
        }
    }

    /// Classifies the failure.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidQuantity(_) | Self::InvalidAmount(_) | Self::InvalidEvent(_) => {
                FailureKind::InvalidInput
            }
            Self::NoOpenPeriod(_) | Self::AccountUnavailable { .. } => FailureKind::Configuration,
            Self::Unbalanced { .. } | Self::MalformedLine(_) => FailureKind::InternalConsistency,
            Self::Lot(err) => err.kind(),
            Self::Disposal(err) => err.kind(),
            Self::Repository(err) => err.kind(),
        }
    }
}

impl From<JournalError> for AppError {
    fn from(err: JournalError) -> Self {
        match err {
            JournalError::Lot(inner) => inner.into(),
            JournalError::Disposal(inner) => inner.into(),
            _ => err.kind().into_app_error(err.to_string()),
        }
    }
}
