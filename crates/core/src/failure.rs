//! Failure classification shared by every engine error.

use costbook_shared::AppError;
use serde::{Deserialize, Serialize};

use crate::disposal::DisposalError;
use crate::lot::LotError;
use crate::reports::ReportError;

/// Broad class of a failure, used to decide how callers react.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Tenant setup is incomplete: no open fiscal year, missing system account.
    Configuration,
    /// The engine would break an accounting invariant. Never committed.
    InternalConsistency,
    /// The event or request itself is malformed.
    InvalidInput,
    /// The persistence layer failed.
    Storage,
}

impl FailureKind {
    /// Returns true for failures that indicate a defect rather than bad data.
    #[must_use]
    pub fn is_defect(self) -> bool {
        matches!(self, Self::InternalConsistency)
    }

    /// Wraps a message in the matching application error category.
    #[must_use]
    pub fn into_app_error(self, message: String) -> AppError {
        match self {
            Self::Configuration => AppError::Configuration(message),
            Self::InternalConsistency => AppError::InternalConsistency(message),
            Self::InvalidInput => AppError::Validation(message),
            Self::Storage => AppError::Storage(message),
        }
    }
}

impl From<LotError> for AppError {
    fn from(err: LotError) -> Self {
        match err {
            LotError::AssetImmutable { .. } => Self::Conflict(err.to_string()),
            LotError::LotNotFound(_) => Self::NotFound(err.to_string()),
            _ => err.kind().into_app_error(err.to_string()),
        }
    }
}

impl From<DisposalError> for AppError {
    fn from(err: DisposalError) -> Self {
        match err {
            DisposalError::Lot(inner) => inner.into(),
            _ => err.kind().into_app_error(err.to_string()),
        }
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        err.kind().into_app_error(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use costbook_shared::types::{AssetSymbol, LotId};
    use rust_decimal_macros::dec;

    #[test]
    fn test_only_consistency_failures_are_defects() {
        assert!(FailureKind::InternalConsistency.is_defect());
        assert!(!FailureKind::Configuration.is_defect());
        assert!(!FailureKind::InvalidInput.is_defect());
        assert!(!FailureKind::Storage.is_defect());
    }

    #[test]
    fn test_lot_errors_to_app_error() {
        let immutable: AppError = LotError::AssetImmutable {
            asset: AssetSymbol::new("BTC"),
            existing: 8,
            requested: 6,
        }
        .into();
        assert_eq!(immutable.status_code(), 409);

        let missing: AppError = LotError::LotNotFound(LotId::new()).into();
        assert_eq!(missing.status_code(), 404);

        let overdrawn: AppError = LotError::LotOverdrawn {
            lot_id: LotId::new(),
            remaining: dec!(1),
            requested: dec!(2),
        }
        .into();
        assert!(overdrawn.is_defect());
    }

    #[test]
    fn test_disposal_errors_to_app_error() {
        let insufficient: AppError = DisposalError::InsufficientLots {
            asset: AssetSymbol::new("ETH"),
            requested: dec!(2),
            available: dec!(1),
        }
        .into();
        assert_eq!(insufficient.status_code(), 400);

        let negative: AppError = DisposalError::InvalidQuantity(dec!(-1)).into();
        assert_eq!(negative.error_code(), "VALIDATION_ERROR");
    }
}
