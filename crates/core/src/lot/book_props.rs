//! Property-based tests for LotBook.
//!
//! - Remaining quantity never goes negative nor above the acquired quantity
//! - A rejected reduction leaves the book untouched

use chrono::{Duration, TimeZone, Utc};
use costbook_shared::types::{AssetSymbol, SourceEventId, TenantId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::book::LotBook;
use super::types::AcquisitionLot;

/// Strategy to generate quantities (0.0001 to 100.0000).
fn quantity() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Strategy to generate a sequence of (lot index, reduction) steps.
fn steps() -> impl Strategy<Value = Vec<(usize, Decimal)>> {
    prop::collection::vec((0usize..8, quantity()), 1..40)
}

fn make_book(quantities: &[Decimal]) -> LotBook {
    let tenant = TenantId::new();
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let lots = quantities
        .iter()
        .enumerate()
        .map(|(i, q)| {
            AcquisitionLot::new(
                tenant,
                AssetSymbol::new("ETH"),
                SourceEventId::new(format!("buy-{i}")),
                *q,
                *q * Decimal::from(2000),
                start + Duration::hours(i64::try_from(i).unwrap()),
            )
            .unwrap()
        })
        .collect();
    LotBook::from_lots(lots)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* sequence of reductions, every lot keeps
    /// `0 <= remaining <= acquired`.
    #[test]
    fn prop_remaining_stays_within_bounds(
        quantities in prop::collection::vec(quantity(), 1..8),
        steps in steps(),
    ) {
        let mut book = make_book(&quantities);

        for (index, amount) in steps {
            let ids: Vec<_> = book.lots().iter().map(|l| l.id).collect();
            let lot_id = ids[index % ids.len()];
            let before = book.clone();

            if book.reduce(lot_id, amount).is_err() {
                prop_assert_eq!(&book, &before, "Failed reduction must not mutate");
            }

            for lot in book.lots() {
                prop_assert!(lot.remaining_quantity >= Decimal::ZERO);
                prop_assert!(lot.remaining_quantity <= lot.acquired_quantity);
            }
        }
    }

    /// *For any* book, the remaining cost never exceeds the total acquisition cost.
    #[test]
    fn prop_remaining_cost_bounded(
        quantities in prop::collection::vec(quantity(), 1..8),
        steps in steps(),
    ) {
        let mut book = make_book(&quantities);
        let total_cost: Decimal = book.lots().iter().map(|l| l.total_cost).sum();

        for (index, amount) in steps {
            let ids: Vec<_> = book.lots().iter().map(|l| l.id).collect();
            let _ = book.reduce(ids[index % ids.len()], amount);
            let remaining_cost: Decimal =
                book.lots().iter().map(AcquisitionLot::remaining_cost).sum();
            prop_assert!(remaining_cost <= total_cost);
        }
    }
}
