//! Report error types.

use chrono::NaiveDate;
use thiserror::Error;

use crate::disposal::DisposalError;
use crate::failure::FailureKind;
use crate::repository::RepositoryError;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Failure while replaying history for a point-in-time view.
    #[error(transparent)]
    Replay(#[from] DisposalError),

    /// Repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ReportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::Replay(err) => err.error_code(),
            Self::Repository(err) => err.error_code(),
        }
    }

    /// Classifies the failure.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidDateRange { .. } => FailureKind::InvalidInput,
            Self::Replay(err) => err.kind(),
            Self::Repository(err) => err.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_date_range() {
        let err = ReportError::InvalidDateRange {
            start: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid date range: start 2025-12-31 is after end 2025-01-01"
        );
        assert_eq!(err.error_code(), "INVALID_DATE_RANGE");
        assert_eq!(err.kind(), FailureKind::InvalidInput);
    }
}
