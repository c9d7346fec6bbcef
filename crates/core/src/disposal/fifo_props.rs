//! Property-based tests for FIFO allocation.
//!
//! - Consumed quantity equals min(requested, available)
//! - Applying the allocation never overdraws a lot
//! - Slices are taken oldest first, only the last one partially

use chrono::{Duration, TimeZone, Utc};
use costbook_shared::ShortfallPolicy;
use costbook_shared::types::{AssetSymbol, SourceEventId, TenantId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::fifo::allocate;
use super::types::DisposalRequest;
use crate::lot::{AcquisitionLot, LotBook};

/// Strategy to generate quantities (0.00000001 to 10.00000000).
fn quantity() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000i64).prop_map(|v| Decimal::new(v, 8))
}

/// Strategy to generate fiat amounts (0.01 to 100,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn make_lots(spec: &[(Decimal, Decimal)]) -> Vec<AcquisitionLot> {
    let tenant = TenantId::new();
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    spec.iter()
        .enumerate()
        .map(|(i, (q, cost))| {
            AcquisitionLot::new(
                tenant,
                AssetSymbol::new("SOL"),
                SourceEventId::new(format!("lot-{i}")),
                *q,
                *cost,
                start + Duration::days(i64::try_from(i).unwrap()),
            )
            .unwrap()
        })
        .collect()
}

fn make_request(quantity: Decimal, proceeds: Decimal) -> DisposalRequest {
    DisposalRequest {
        asset: AssetSymbol::new("SOL"),
        quantity,
        disposed_at: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        proceeds,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* lots and request, the consumed quantity is
    /// `min(requested, available)` and the shortfall is the rest.
    #[test]
    fn prop_consumed_equals_min_of_requested_and_available(
        spec in prop::collection::vec((quantity(), amount()), 0..6),
        requested in quantity(),
        proceeds in amount(),
    ) {
        let lots = make_lots(&spec);
        let available: Decimal = lots.iter().map(|l| l.remaining_quantity).sum();

        let request = make_request(requested, proceeds);

        let result = allocate(&lots, &request, ShortfallPolicy::Lenient).unwrap();

        prop_assert_eq!(result.consumed_quantity(), requested.min(available));
        prop_assert_eq!(result.shortfall, requested - requested.min(available));
        prop_assert_eq!(result.realized_gain_or_loss, proceeds - result.total_cost_basis);
    }

    /// *For any* allocation, applying its reductions to the same lots succeeds.
    #[test]
    fn prop_allocation_never_overdraws(
        spec in prop::collection::vec((quantity(), amount()), 1..6),
        requested in quantity(),
    ) {
        let lots = make_lots(&spec);
        let request = make_request(requested, Decimal::ONE);
        let result = allocate(&lots, &request, ShortfallPolicy::Lenient).unwrap();

        let mut book = LotBook::from_lots(lots);
        prop_assert!(book.apply(&result.reductions()).is_ok());
        for lot in book.lots() {
            prop_assert!(lot.remaining_quantity >= Decimal::ZERO);
        }
    }

    /// *For any* allocation, every slice but the last drains its lot.
    #[test]
    fn prop_only_last_slice_is_partial(
        spec in prop::collection::vec((quantity(), amount()), 1..6),
        requested in quantity(),
    ) {
        let lots = make_lots(&spec);
        let request = make_request(requested, Decimal::ONE);
        let result = allocate(&lots, &request, ShortfallPolicy::Lenient).unwrap();

        if let Some((_, head)) = result.consumptions.split_last() {
            for (slice, lot) in head.iter().zip(lots.iter()) {
                prop_assert_eq!(slice.lot_id, lot.id);
                prop_assert_eq!(slice.quantity_consumed, lot.acquired_quantity);
            }
        }
    }

    /// Reject policy fails exactly when the lots do not cover the request.
    #[test]
    fn prop_reject_policy_matches_availability(
        spec in prop::collection::vec((quantity(), amount()), 0..6),
        requested in quantity(),
    ) {
        let lots = make_lots(&spec);
        let available: Decimal = lots.iter().map(|l| l.remaining_quantity).sum();

        let request = make_request(requested, Decimal::ONE);

        let result = allocate(&lots, &request, ShortfallPolicy::Reject);
        prop_assert_eq!(result.is_err(), requested > available);
    }
}
