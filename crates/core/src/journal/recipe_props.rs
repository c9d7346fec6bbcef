//! Property-based tests for journal recipes.
//!
//! - Every recipe balances for any values, cost basis, fee and scale
//! - A disposal never carries both a gain and a loss line
//! - No line carries a zero amount

use chrono::{TimeZone, Utc};
use costbook_shared::types::{AssetSymbol, Currency, SourceEventId, TenantId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::event::{AssetLeg, Fee, MovementEvent, MovementKind};
use super::recipe::{DraftLine, draft_lines};
use crate::account::AccountRole;

/// Strategy to generate fiat amounts with up to 6 decimals (0 to 1,000,000).
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000_000i64).prop_map(|v| Decimal::new(v, 6))
}

/// Strategy to generate a leg.
fn leg(symbol: &'static str) -> impl Strategy<Value = AssetLeg> {
    ((1i64..1_000_000i64), amount())
        .prop_map(move |(q, value)| AssetLeg::new(symbol, Decimal::new(q, 4), value))
}

/// Strategy to generate every movement kind.
fn kind() -> impl Strategy<Value = MovementKind> {
    prop_oneof![
        leg("BTC").prop_map(|leg| MovementKind::Acquisition { leg }),
        leg("BTC").prop_map(|leg| MovementKind::Disposal { leg }),
        (leg("ETH"), leg("USDC"))
            .prop_map(|(outgoing, incoming)| MovementKind::Swap { outgoing, incoming }),
        leg("ETH").prop_map(|leg| MovementKind::Reward { leg }),
        leg("ETH").prop_map(|leg| MovementKind::Stake { leg }),
        leg("ETH").prop_map(|leg| MovementKind::Unstake { leg }),
    ]
}

/// Strategy to generate an optional fee.
fn fee() -> impl Strategy<Value = Option<Fee>> {
    prop::option::of(amount().prop_map(|value| Fee {
        asset: AssetSymbol::new("ETH"),
        quantity: Decimal::new(1, 3),
        value,
    }))
}

fn make_event(kind: MovementKind, fee: Option<Fee>) -> MovementEvent {
    MovementEvent {
        tenant_id: TenantId::new(),
        source_event_id: SourceEventId::new("prop"),
        occurred_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        kind,
        fee,
    }
}

fn sums(lines: &[DraftLine]) -> (Decimal, Decimal) {
    (
        lines.iter().map(|l| l.debit).sum(),
        lines.iter().map(|l| l.credit).sum(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* event, debits equal credits.
    #[test]
    fn prop_every_recipe_balances(
        kind in kind(),
        fee in fee(),
        cost_basis in amount(),
        currency in prop_oneof![Just(Currency::Eur), Just(Currency::Jpy)],
    ) {
        let event = make_event(kind, fee);
        let lines = draft_lines(&event, cost_basis, currency);

        let (debit, credit) = sums(&lines);
        prop_assert_eq!(debit, credit);
    }

    /// *For any* event, every line is one-sided, non-zero, non-negative and at scale.
    #[test]
    fn prop_lines_are_well_formed(
        kind in kind(),
        fee in fee(),
        cost_basis in amount(),
        currency in prop_oneof![Just(Currency::Eur), Just(Currency::Jpy)],
    ) {
        let event = make_event(kind, fee);
        let scale = currency.minor_units();
        for line in draft_lines(&event, cost_basis, currency) {
            prop_assert!(line.debit >= Decimal::ZERO && line.credit >= Decimal::ZERO);
            prop_assert!(line.debit.is_zero() != line.credit.is_zero());
            prop_assert!(line.debit.scale() <= scale && line.credit.scale() <= scale);
        }
    }

    /// *For any* disposal, gain and loss lines are mutually exclusive.
    #[test]
    fn prop_never_both_gain_and_loss(
        leg in leg("BTC"),
        cost_basis in amount(),
    ) {
        let event = make_event(MovementKind::Disposal { leg }, None);
        let lines = draft_lines(&event, cost_basis, Currency::Eur);

        let has_gain = lines.iter().any(|l| l.role == AccountRole::RealizedGain);
        let has_loss = lines.iter().any(|l| l.role == AccountRole::RealizedLoss);
        prop_assert!(!(has_gain && has_loss));
    }
}
