//! Asset registry rules.
//!
//! Assets are tenant-scoped and carry the number of fractional digits their
//! quantities may use. The precision is frozen as soon as a lot exists.

use costbook_shared::types::{AssetSymbol, TenantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::lot::LotError;

/// A fungible digital asset known to a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Ticker symbol.
    pub symbol: AssetSymbol,
    /// Maximum fractional digits of a quantity.
    pub precision: u32,
}

impl Asset {
    /// Creates a new asset definition.
    #[must_use]
    pub fn new(tenant_id: TenantId, symbol: AssetSymbol, precision: u32) -> Self {
        Self {
            tenant_id,
            symbol,
            precision,
        }
    }

    /// Checks that a quantity fits the asset precision.
    ///
    /// Trailing zeros do not count: `1.50` has scale 1.
    pub fn check_quantity(&self, quantity: Decimal) -> Result<(), LotError> {
        let scale = quantity.normalize().scale();
        if scale > self.precision {
            return Err(LotError::PrecisionExceeded {
                asset: self.symbol.clone(),
                precision: self.precision,
                scale,
            });
        }
        Ok(())
    }

    /// Checks whether the definition may change to a new precision.
    pub fn check_redefinition(&self, precision: u32, has_lots: bool) -> Result<(), LotError> {
        if self.precision != precision && has_lots {
            return Err(LotError::AssetImmutable {
                asset: self.symbol.clone(),
                existing: self.precision,
                requested: precision,
            });
        }
        Ok(())
    }
}
