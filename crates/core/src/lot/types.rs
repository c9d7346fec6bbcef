//! Acquisition lot types.

use chrono::{DateTime, Utc};
use costbook_shared::types::{AssetSymbol, LotId, SourceEventId, TenantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LotError;

/// A quantity of one asset acquired at one time for one total cost.
///
/// Invariant: `0 <= remaining_quantity <= acquired_quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionLot {
    /// Deterministic identifier, see [`LotId::for_source`].
    pub id: LotId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Asset held.
    pub asset: AssetSymbol,
    /// Event the lot was acquired by.
    pub source_event_id: SourceEventId,
    /// Acquisition timestamp.
    pub acquired_at: DateTime<Utc>,
    /// Quantity acquired.
    pub acquired_quantity: Decimal,
    /// Quantity not yet disposed of.
    pub remaining_quantity: Decimal,
    /// Total acquisition cost in reporting currency.
    pub total_cost: Decimal,
    /// Arrival sequence, breaks ties between equal timestamps.
    pub sequence: u64,
}

impl AcquisitionLot {
    /// Creates a full, unconsumed lot.
    pub fn new(
        tenant_id: TenantId,
        asset: AssetSymbol,
        source_event_id: SourceEventId,
        quantity: Decimal,
        total_cost: Decimal,
        acquired_at: DateTime<Utc>,
    ) -> Result<Self, LotError> {
        if quantity.is_sign_negative() && !quantity.is_zero() {
            return Err(LotError::InvalidQuantity(quantity));
        }
        if total_cost.is_sign_negative() && !total_cost.is_zero() {
            return Err(LotError::InvalidAmount(total_cost));
        }

        Ok(Self {
            id: LotId::for_source(tenant_id, &source_event_id, &asset),
            tenant_id,
            asset,
            source_event_id,
            acquired_at,
            acquired_quantity: quantity,
            remaining_quantity: quantity,
            total_cost,
            sequence: 0,
        })
    }

    /// Sets the arrival sequence.
    #[must_use]
    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    /// Cost per unit; zero for an empty acquisition.
    #[must_use]
    pub fn unit_cost(&self) -> Decimal {
        if self.acquired_quantity.is_zero() {
            Decimal::ZERO
        } else {
            self.total_cost / self.acquired_quantity
        }
    }

    /// Cost attributable to `quantity` units of this lot.
    ///
    /// Computed as `quantity * total_cost / acquired_quantity` so that
    /// consuming a lot in slices adds up to its total cost.
    #[must_use]
    pub fn cost_of(&self, quantity: Decimal) -> Decimal {
        if self.acquired_quantity.is_zero() {
            Decimal::ZERO
        } else {
            quantity * self.total_cost / self.acquired_quantity
        }
    }

    /// Cost of the units still held.
    #[must_use]
    pub fn remaining_cost(&self) -> Decimal {
        self.cost_of(self.remaining_quantity)
    }

    /// Returns true if units remain.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.remaining_quantity > Decimal::ZERO
    }

    /// Removes `quantity` units.
    pub fn reduce(&mut self, quantity: Decimal) -> Result<(), LotError> {
        if quantity.is_sign_negative() && !quantity.is_zero() {
            return Err(LotError::InvalidQuantity(quantity));
        }
        if quantity > self.remaining_quantity {
            return Err(LotError::LotOverdrawn {
                lot_id: self.id,
                remaining: self.remaining_quantity,
                requested: quantity,
            });
        }
        self.remaining_quantity -= quantity;
        Ok(())
    }

    /// Ordering key for FIFO consumption.
    #[must_use]
    pub fn fifo_key(&self) -> (DateTime<Utc>, u64, LotId) {
        (self.acquired_at, self.sequence, self.id)
    }
}

/// A decrement of one lot's remaining quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotReduction {
    /// Asset of the lot.
    pub asset: AssetSymbol,
    /// The lot.
    pub lot_id: LotId,
    /// Units removed.
    pub quantity: Decimal,
}
