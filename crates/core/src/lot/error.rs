//! Lot ledger error types.

use costbook_shared::types::{AssetSymbol, LotId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::failure::FailureKind;
use crate::repository::RepositoryError;

/// Errors that can occur during lot operations.
#[derive(Debug, Error)]
pub enum LotError {
    // ========== Validation Errors ==========
    /// Quantity cannot be negative.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(Decimal),

    /// Cost cannot be negative.
    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    /// Quantity has more fractional digits than the asset allows.
    #[error("Quantity for {asset} has {scale} fractional digits, precision is {precision}")]
    PrecisionExceeded {
        /// The asset.
        asset: AssetSymbol,
        /// Registered precision.
        precision: u32,
        /// Scale of the rejected quantity.
        scale: u32,
    },

    /// Asset precision cannot change once lots exist.
    #[error("Asset {asset} is immutable: precision {existing} cannot change to {requested}")]
    AssetImmutable {
        /// The asset.
        asset: AssetSymbol,
        /// Registered precision.
        existing: u32,
        /// Precision that was requested.
        requested: u32,
    },

    // ========== Consistency Errors ==========
    /// Reduction would take the lot below zero.
    #[error("Lot {lot_id} overdrawn: remaining {remaining}, requested {requested}")]
    LotOverdrawn {
        /// The lot.
        lot_id: LotId,
        /// Quantity left on the lot.
        remaining: Decimal,
        /// Quantity the reduction asked for.
        requested: Decimal,
    },

    /// Lot not found.
    #[error("Lot not found: {0}")]
    LotNotFound(LotId),

    // ========== Storage Errors ==========
    /// Repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl LotError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidQuantity(_) => "INVALID_QUANTITY",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::PrecisionExceeded { .. } => "PRECISION_EXCEEDED",
            Self::AssetImmutable { .. } => "ASSET_IMMUTABLE",
            Self::LotOverdrawn { .. } => "LOT_OVERDRAWN",
            Self::LotNotFound(_) => "LOT_NOT_FOUND",
            Self::Repository(err) => err.error_code(),
        }
    }

    /// Classifies the failure.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidQuantity(_)
            | Self::InvalidAmount(_)
            | Self::PrecisionExceeded { .. }
            | Self::AssetImmutable { .. } => FailureKind::InvalidInput,
            Self::LotOverdrawn { .. } | Self::LotNotFound(_) => FailureKind::InternalConsistency,
            Self::Repository(err) => err.kind(),
        }
    }
}
