//! Disposal domain types.

use chrono::{DateTime, Utc};
use costbook_shared::types::{AssetSymbol, LotId, SourceEventId, TenantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::lot::LotReduction;

/// Units taken from one lot by a disposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumption {
    /// The lot consumed.
    pub lot_id: LotId,
    /// Units taken from it.
    pub quantity_consumed: Decimal,
    /// The lot's unit cost.
    pub unit_cost: Decimal,
    /// Cost attributed to the units taken.
    pub cost_basis: Decimal,
    /// When the lot was acquired.
    pub acquired_at: DateTime<Utc>,
    /// Whole days between acquisition and disposal, rounded down.
    pub holding_period_days: i64,
}

/// A request to dispose of a quantity of one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisposalRequest {
    /// Asset disposed of.
    pub asset: AssetSymbol,
    /// Units disposed of.
    pub quantity: Decimal,
    /// Disposal timestamp.
    pub disposed_at: DateTime<Utc>,
    /// Proceeds in reporting currency.
    pub proceeds: Decimal,
}

/// Outcome of a FIFO disposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisposalResult {
    /// Asset disposed of.
    pub asset: AssetSymbol,
    /// Units requested.
    pub quantity: Decimal,
    /// Disposal timestamp.
    pub disposed_at: DateTime<Utc>,
    /// Proceeds in reporting currency.
    pub proceeds: Decimal,
    /// Sum of the consumed slices' cost.
    pub total_cost_basis: Decimal,
    /// `proceeds - total_cost_basis`, sign preserved.
    pub realized_gain_or_loss: Decimal,
    /// Slices, oldest lot first.
    pub consumptions: Vec<Consumption>,
    /// Requested units no lot covered.
    pub shortfall: Decimal,
}

impl DisposalResult {
    /// Units actually taken from lots.
    #[must_use]
    pub fn consumed_quantity(&self) -> Decimal {
        self.consumptions.iter().map(|c| c.quantity_consumed).sum()
    }

    /// Lot reductions that realize this disposal.
    #[must_use]
    pub fn reductions(&self) -> Vec<LotReduction> {
        self.consumptions
            .iter()
            .map(|c| LotReduction {
                asset: self.asset.clone(),
                lot_id: c.lot_id,
                quantity: c.quantity_consumed,
            })
            .collect()
    }

    /// Returns true if the disposal was not fully covered.
    #[must_use]
    pub fn has_shortfall(&self) -> bool {
        self.shortfall > Decimal::ZERO
    }
}

/// Persisted outcome of a disposal triggered by a source event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisposalRecord {
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Event that disposed of the asset.
    pub source_event_id: SourceEventId,
    /// Asset disposed of.
    pub asset: AssetSymbol,
    /// Disposal timestamp.
    pub disposed_at: DateTime<Utc>,
    /// Units requested.
    pub quantity: Decimal,
    /// Proceeds in reporting currency.
    pub proceeds: Decimal,
    /// Cost basis of the consumed slices.
    pub cost_basis: Decimal,
    /// Realized gain (positive) or loss (negative).
    pub realized_gain_or_loss: Decimal,
    /// Consumed slices.
    pub consumptions: Vec<Consumption>,
    /// Uncovered units.
    pub shortfall: Decimal,
}

impl DisposalRecord {
    /// Records a disposal result under its source event.
    #[must_use]
    pub fn from_result(
        tenant_id: TenantId,
        source_event_id: SourceEventId,
        result: DisposalResult,
    ) -> Self {
        Self {
            tenant_id,
            source_event_id,
            asset: result.asset,
            disposed_at: result.disposed_at,
            quantity: result.quantity,
            proceeds: result.proceeds,
            cost_basis: result.total_cost_basis,
            realized_gain_or_loss: result.realized_gain_or_loss,
            consumptions: result.consumptions,
            shortfall: result.shortfall,
        }
    }
}
