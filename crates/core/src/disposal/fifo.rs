//! FIFO lot allocation.
//!
//! Pure computation: given the lots of one asset, decide which slices a
//! disposal consumes and what they cost. Nothing is mutated here; the
//! caller applies [`DisposalResult::reductions`] through the lot ledger or
//! a change set.

use chrono::{DateTime, Utc};
use costbook_shared::ShortfallPolicy;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::error::DisposalError;
use super::types::{Consumption, DisposalRequest, DisposalResult};
use crate::lot::AcquisitionLot;

const SECONDS_PER_DAY: i64 = 86_400;

/// Whole days between two instants, rounded down.
#[must_use]
pub fn holding_period_days(acquired_at: DateTime<Utc>, disposed_at: DateTime<Utc>) -> i64 {
    (disposed_at - acquired_at)
        .num_seconds()
        .div_euclid(SECONDS_PER_DAY)
}

/// Allocates a disposal across lots, oldest first.
///
/// Under [`ShortfallPolicy::Lenient`] an uncovered remainder is reported in
/// `shortfall`; under [`ShortfallPolicy::Reject`] it fails before anything
/// is allocated.
pub fn allocate(
    lots: &[AcquisitionLot],
    request: &DisposalRequest,
    policy: ShortfallPolicy,
) -> Result<DisposalResult, DisposalError> {
    if request.quantity.is_sign_negative() && !request.quantity.is_zero() {
        return Err(DisposalError::InvalidQuantity(request.quantity));
    }
    if request.proceeds.is_sign_negative() && !request.proceeds.is_zero() {
        return Err(DisposalError::InvalidProceeds(request.proceeds));
    }

    let mut open: Vec<&AcquisitionLot> = lots.iter().filter(|lot| lot.is_open()).collect();
    open.sort_by_key(|lot| lot.fifo_key());

    let available: Decimal = open.iter().map(|lot| lot.remaining_quantity).sum();
    if policy == ShortfallPolicy::Reject && available < request.quantity {
        return Err(DisposalError::InsufficientLots {
            asset: request.asset.clone(),
            requested: request.quantity,
            available,
        });
    }

    let mut still_needed = request.quantity;
    let mut total_cost_basis = Decimal::ZERO;
    let mut consumptions = Vec::new();

    for lot in open {
        if still_needed <= Decimal::ZERO {
            break;
        }

        let taken = still_needed.min(lot.remaining_quantity);
        let cost_basis = lot.cost_of(taken);

        consumptions.push(Consumption {
            lot_id: lot.id,
            quantity_consumed: taken,
            unit_cost: lot.unit_cost(),
            cost_basis,
            acquired_at: lot.acquired_at,
            holding_period_days: holding_period_days(lot.acquired_at, request.disposed_at),
        });

        total_cost_basis += cost_basis;
        still_needed -= taken;
    }

    let shortfall = still_needed.max(Decimal::ZERO);
    if shortfall > Decimal::ZERO {
        warn!(
            asset = %request.asset,
            requested = %request.quantity,
            available = %available,
            shortfall = %shortfall,
            "Disposal exceeds open lots, cost basis covers consumed units only"
        );
    }

    debug!(
        asset = %request.asset,
        lots_consumed = consumptions.len(),
        cost_basis = %total_cost_basis,
        "FIFO allocation computed"
    );

    Ok(DisposalResult {
        asset: request.asset.clone(),
        quantity: request.quantity,
        disposed_at: request.disposed_at,
        proceeds: request.proceeds,
        total_cost_basis,
        realized_gain_or_loss: request.proceeds - total_cost_basis,
        consumptions,
        shortfall,
    })
}
