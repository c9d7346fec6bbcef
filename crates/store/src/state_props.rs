//! Property-based tests for reduction validation.
//!
//! - Validation accepts exactly when each lot's summed request fits
//! - Applying validated reductions never drives a lot negative

use std::collections::HashMap;

use chrono::{Duration, TimeZone, Utc};
use costbook_core::journal::{AssetLeg, MovementEvent, MovementKind};
use costbook_core::lot::{AcquisitionLot, LotReduction};
use costbook_shared::types::{AssetSymbol, SourceEventId, TenantId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::state::TenantState;

fn quantity() -> impl Strategy<Value = Decimal> {
    (1i64..100_000i64).prop_map(|v| Decimal::new(v, 3))
}

fn seeded(quantities: &[Decimal]) -> (TenantState, Vec<AcquisitionLot>) {
    let tenant = TenantId::new();
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let mut state = TenantState::default();

    let lots = quantities
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let source = SourceEventId::new(format!("buy-{i}"));
            let at = start + Duration::days(i64::try_from(i).unwrap());
            let lot = AcquisitionLot::new(
                tenant,
                AssetSymbol::new("SOL"),
                source.clone(),
                *q,
                *q * Decimal::from(150),
                at,
            )
            .unwrap();
            let event = MovementEvent {
                tenant_id: tenant,
                source_event_id: source,
                occurred_at: at,
                kind: MovementKind::Acquisition {
                    leg: AssetLeg::new("SOL", *q, *q * Decimal::from(150)),
                },
                fee: None,
            };
            state.insert_lot(lot, event).unwrap()
        })
        .collect();

    (state, lots)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* batch of reductions, validation passes iff no lot is asked
    /// for more than it holds, and applying a valid batch keeps lots non-negative.
    #[test]
    fn prop_validation_matches_summed_requests(
        quantities in prop::collection::vec(quantity(), 1..6),
        requests in prop::collection::vec((0usize..6, quantity()), 0..12),
    ) {
        let (mut state, lots) = seeded(&quantities);

        let reductions: Vec<LotReduction> = requests
            .iter()
            .map(|(index, amount)| {
                let lot = &lots[index % lots.len()];
                LotReduction {
                    asset: lot.asset.clone(),
                    lot_id: lot.id,
                    quantity: *amount,
                }
            })
            .collect();

        let mut summed: HashMap<_, Decimal> = HashMap::new();
        for reduction in &reductions {
            *summed.entry(reduction.lot_id).or_default() += reduction.quantity;
        }
        let fits = lots
            .iter()
            .all(|lot| summed.get(&lot.id).copied().unwrap_or_default() <= lot.remaining_quantity);

        let validated = state.validate_reductions(&reductions);
        prop_assert_eq!(validated.is_ok(), fits);

        if validated.is_ok() {
            state.apply_validated(&reductions);
            for lot in &state.lots[&AssetSymbol::new("SOL")] {
                prop_assert!(lot.remaining_quantity >= Decimal::ZERO);
            }
        }
    }
}
