//! Disposal error types.

use costbook_shared::types::AssetSymbol;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::failure::FailureKind;
use crate::lot::LotError;
use crate::repository::RepositoryError;

/// Errors that can occur while disposing of an asset.
#[derive(Debug, Error)]
pub enum DisposalError {
    /// Quantity cannot be negative.
    #[error("Invalid disposal quantity: {0}")]
    InvalidQuantity(Decimal),

    /// Proceeds cannot be negative.
    #[error("Invalid disposal proceeds: {0}")]
    InvalidProceeds(Decimal),

    /// Open lots do not cover the request and the policy rejects shortfalls.
    #[error("Insufficient lots for {asset}: requested {requested}, available {available}")]
    InsufficientLots {
        /// The asset.
        asset: AssetSymbol,
        /// Units requested.
        requested: Decimal,
        /// Units held in open lots.
        available: Decimal,
    },

    /// Lot failure.
    #[error(transparent)]
    Lot(#[from] LotError),

    /// Repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl DisposalError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidQuantity(_) => "INVALID_QUANTITY",
            Self::InvalidProceeds(_) => "INVALID_AMOUNT",
            Self::InsufficientLots { .. } => "INSUFFICIENT_LOTS",
            Self::Lot(err) => err.error_code(),
            Self::Repository(err) => err.error_code(),
        }
    }

    /// Classifies the failure.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidQuantity(_) | Self::InvalidProceeds(_) | Self::InsufficientLots { .. } => {
                FailureKind::InvalidInput
            }
            Self::Lot(err) => err.kind(),
            Self::Repository(err) => err.kind(),
        }
    }
}
