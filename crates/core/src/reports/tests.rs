//! Tests for the reports module.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use costbook_shared::types::{AssetSymbol, LotId, SourceEventId, TenantId};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::ReportError;
use super::service::ReportService;
use super::types::{DateRange, HoldingBucket, Position};
use crate::disposal::{Consumption, DisposalRecord};
use crate::lot::AcquisitionLot;

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn lot(asset: &str, source: &str, quantity: Decimal, cost: Decimal) -> AcquisitionLot {
    AcquisitionLot::new(
        TenantId::new(),
        AssetSymbol::new(asset),
        SourceEventId::new(source),
        quantity,
        cost,
        at(2024, 1, 1),
    )
    .unwrap()
}

fn slice(quantity: Decimal, cost_basis: Decimal, held_days: i64) -> Consumption {
    Consumption {
        lot_id: LotId::new(),
        quantity_consumed: quantity,
        unit_cost: cost_basis / quantity,
        cost_basis,
        acquired_at: at(2024, 1, 1),
        holding_period_days: held_days,
    }
}

fn record(
    source: &str,
    disposed_at: DateTime<Utc>,
    proceeds: Decimal,
    slices: Vec<Consumption>,
) -> DisposalRecord {
    let cost_basis: Decimal = slices.iter().map(|s| s.cost_basis).sum();
    let quantity: Decimal = slices.iter().map(|s| s.quantity_consumed).sum();
    DisposalRecord {
        tenant_id: TenantId::new(),
        source_event_id: SourceEventId::new(source),
        asset: AssetSymbol::new("BTC"),
        disposed_at,
        quantity,
        proceeds,
        cost_basis,
        realized_gain_or_loss: proceeds - cost_basis,
        consumptions: slices,
        shortfall: Decimal::ZERO,
    }
}

// ============================================================================
// Positions
// ============================================================================

#[test]
fn test_positions_aggregate_open_lots() {
    let mut partly_sold = lot("BTC", "b", dec!(1), dec!(40000));
    partly_sold.reduce(dec!(0.5)).unwrap();

    let positions = ReportService::positions(vec![
        (
            AssetSymbol::new("BTC"),
            vec![lot("BTC", "a", dec!(1), dec!(30000)), partly_sold],
        ),
        (AssetSymbol::new("ADA"), vec![lot("ADA", "c", dec!(100), dec!(50))]),
    ]);

    assert_eq!(positions.len(), 2);
    assert_eq!(positions[0].asset.as_str(), "ADA");
    assert_eq!(positions[1].total_remaining_quantity, dec!(1.5));
    assert_eq!(positions[1].total_cost_basis, dec!(50000));
    assert_eq!(positions[1].average_unit_cost.round_dp(2), dec!(33333.33));
}

#[test]
fn test_positions_skip_empty_assets() {
    let mut sold = lot("ETH", "a", dec!(2), dec!(4000));
    sold.reduce(dec!(2)).unwrap();

    let positions = ReportService::positions(vec![
        (AssetSymbol::new("ETH"), vec![sold]),
        (AssetSymbol::new("SOL"), vec![]),
    ]);
    assert!(positions.is_empty());
}

#[test]
fn test_valued_positions() {
    let btc = [lot("BTC", "a", dec!(2), dec!(60000))];
    let eth = [lot("ETH", "b", dec!(10), dec!(20000))];
    let positions = vec![
        Position::from_lots(AssetSymbol::new("BTC"), &btc),
        Position::from_lots(AssetSymbol::new("ETH"), &eth),
    ];
    let prices = HashMap::from([(AssetSymbol::new("BTC"), dec!(45000))]);

    let valued = ReportService::valued_positions(positions, &prices);

    assert_eq!(valued[0].current_value, Some(dec!(90000)));
    assert_eq!(valued[0].unrealized_gain_or_loss, Some(dec!(30000)));
    assert_eq!(valued[1].unit_price, None);
    assert_eq!(valued[1].unrealized_gain_or_loss, None);
}

// ============================================================================
// Disposal report
// ============================================================================

#[test]
fn test_date_range_validation() {
    assert!(DateRange::new(date(2025, 1, 1), date(2025, 1, 1)).is_ok());
    assert!(matches!(
        DateRange::new(date(2025, 2, 1), date(2025, 1, 1)),
        Err(ReportError::InvalidDateRange { .. })
    ));
}

#[test]
fn test_disposal_split_into_buckets() {
    // 1 BTC held 400 days (cost 10k) + 1 BTC held 100 days (cost 30k), sold for 50k.
    let records = vec![record(
        "sell-1",
        at(2025, 6, 1),
        dec!(50000),
        vec![slice(dec!(1), dec!(10000), 400), slice(dec!(1), dec!(30000), 100)],
    )];
    let range = DateRange::new(date(2025, 1, 1), date(2025, 12, 31)).unwrap();

    let report = ReportService::disposal_report(&records, range, 365);

    assert_eq!(report.entries.len(), 2);
    let long = &report.entries[0];
    let short = &report.entries[1];
    assert_eq!(long.bucket, HoldingBucket::Long);
    assert_eq!(long.proceeds, dec!(25000));
    assert_eq!(long.gain_or_loss, dec!(15000));
    assert_eq!(short.bucket, HoldingBucket::Short);
    assert_eq!(short.gain_or_loss, dec!(-5000));

    assert_eq!(report.totals.total_proceeds, dec!(50000));
    assert_eq!(report.totals.total_cost_basis, dec!(40000));
    assert_eq!(report.totals.total_gain_loss, dec!(10000));
    assert_eq!(report.totals.long_term_gain_loss, dec!(15000));
    assert_eq!(report.totals.short_term_gain_loss, dec!(-5000));
}

#[test]
fn test_threshold_is_inclusive() {
    let records = vec![record(
        "sell-1",
        at(2025, 6, 1),
        dec!(100),
        vec![slice(dec!(1), dec!(50), 365)],
    )];
    let range = DateRange::new(date(2025, 6, 1), date(2025, 6, 1)).unwrap();

    let report = ReportService::disposal_report(&records, range, 365);
    assert_eq!(report.entries[0].bucket, HoldingBucket::Long);
}

#[test]
fn test_range_filters_and_orders() {
    let one = slice(dec!(1), dec!(5), 10);
    let records = vec![
        record("late", at(2025, 9, 1), dec!(10), vec![one.clone()]),
        record("outside", at(2024, 12, 31), dec!(10), vec![one.clone()]),
        record("early", at(2025, 2, 1), dec!(10), vec![one]),
    ];
    let range = DateRange::new(date(2025, 1, 1), date(2025, 12, 31)).unwrap();

    let report = ReportService::disposal_report(&records, range, 365);
    let order: Vec<_> = report.entries.iter().map(|r| r.source_event_id.as_str()).collect();
    assert_eq!(order, vec!["early", "late"]);
}

#[test]
fn test_uncovered_disposal_is_one_short_row() {
    let mut uncovered = record("sell-x", at(2025, 3, 1), dec!(900), vec![]);
    uncovered.quantity = dec!(0.3);
    uncovered.shortfall = dec!(0.3);
    let range = DateRange::new(date(2025, 1, 1), date(2025, 12, 31)).unwrap();

    let report = ReportService::disposal_report(&[uncovered], range, 365);
    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].bucket, HoldingBucket::Short);
    assert_eq!(report.entries[0].gain_or_loss, dec!(900));
}

/// Strategy to generate (quantity, cost, held days) slices.
fn slices() -> impl Strategy<Value = Vec<(Decimal, Decimal, i64)>> {
    prop::collection::vec(
        (
            (1i64..100_000i64).prop_map(|v| Decimal::new(v, 3)),
            (0i64..10_000_000i64).prop_map(|v| Decimal::new(v, 2)),
            0i64..1000,
        ),
        1..8,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* disposal, rows add up to the recorded proceeds, cost basis
    /// and realized gain, and short plus long equals the total.
    #[test]
    fn prop_rows_reconcile_with_record(
        spec in slices(),
        proceeds in (0i64..10_000_000i64).prop_map(|v| Decimal::new(v, 2)),
        long_term_days in 1i64..800,
    ) {
        let consumptions = spec
            .iter()
            .map(|(q, c, d)| slice(*q, *c, *d))
            .collect();
        let disposed_at = at(2025, 6, 1) + Duration::hours(1);
        let rec = record("p", disposed_at, proceeds, consumptions);
        let range = DateRange::new(date(2025, 1, 1), date(2025, 12, 31)).unwrap();

        let records = std::slice::from_ref(&rec);
        let report = ReportService::disposal_report(records, range, long_term_days);

        prop_assert!(report.entries.len() <= 2);
        prop_assert_eq!(report.totals.total_proceeds, rec.proceeds);
        prop_assert_eq!(report.totals.total_cost_basis, rec.cost_basis);
        prop_assert_eq!(report.totals.total_gain_loss, rec.realized_gain_or_loss);
        prop_assert_eq!(
            report.totals.short_term_gain_loss + report.totals.long_term_gain_loss,
            report.totals.total_gain_loss
        );
    }
}
