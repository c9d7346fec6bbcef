//! Report generation service.

use std::collections::HashMap;

use costbook_shared::types::{AssetSymbol, round_money};
use rust_decimal::Decimal;

use super::types::{
    DateRange, DisposalReport, DisposalReportRow, DisposalReportTotals, HoldingBucket, Position,
    ValuedPosition,
};
use crate::disposal::DisposalRecord;
use crate::lot::AcquisitionLot;

/// Service for generating portfolio and tax reports.
pub struct ReportService;

impl ReportService {
    /// Aggregates lots into positions.
    ///
    /// Assets with nothing remaining are left out; the result is sorted by symbol.
    #[must_use]
    pub fn positions(
        lots_by_asset: impl IntoIterator<Item = (AssetSymbol, Vec<AcquisitionLot>)>,
    ) -> Vec<Position> {
        let mut positions: Vec<Position> = lots_by_asset
            .into_iter()
            .map(|(asset, lots)| Position::from_lots(asset, &lots))
            .filter(|position| !position.is_empty())
            .collect();
        positions.sort_by(|a, b| a.asset.cmp(&b.asset));
        positions
    }

    /// Values positions at caller-supplied unit prices.
    ///
    /// Positions without a price keep `None` valuation fields.
    #[must_use]
    pub fn valued_positions(
        positions: Vec<Position>,
        prices: &HashMap<AssetSymbol, Decimal>,
    ) -> Vec<ValuedPosition> {
        positions
            .into_iter()
            .map(|position| {
                let unit_price = prices.get(&position.asset).copied();
                let current_value = unit_price.map(|p| p * position.total_remaining_quantity);
                let unrealized_gain_or_loss = current_value.map(|v| v - position.total_cost_basis);
                ValuedPosition {
                    position,
                    unit_price,
                    current_value,
                    unrealized_gain_or_loss,
                }
            })
            .collect()
    }

    /// Builds the realized-gains report for disposals inside `range`.
    #[must_use]
    pub fn disposal_report(
        records: &[DisposalRecord],
        range: DateRange,
        long_term_days: i64,
    ) -> DisposalReport {
        let mut selected: Vec<&DisposalRecord> = records
            .iter()
            .filter(|r| range.contains(r.disposed_at.date_naive()))
            .collect();
        selected.sort_by(|a, b| {
            a.disposed_at
                .cmp(&b.disposed_at)
                .then_with(|| a.source_event_id.cmp(&b.source_event_id))
        });

        let entries: Vec<DisposalReportRow> = selected
            .into_iter()
            .flat_map(|record| Self::rows_for(record, long_term_days))
            .collect();

        let mut totals = DisposalReportTotals::default();
        for row in &entries {
            totals.total_proceeds += row.proceeds;
            totals.total_cost_basis += row.cost_basis;
            totals.total_gain_loss += row.gain_or_loss;
            match row.bucket {
                HoldingBucket::Short => totals.short_term_gain_loss += row.gain_or_loss,
                HoldingBucket::Long => totals.long_term_gain_loss += row.gain_or_loss,
            }
        }

        DisposalReport {
            range,
            long_term_days,
            entries,
            totals,
        }
    }

    /// Splits one disposal into at most one row per holding bucket.
    ///
    /// Proceeds are apportioned by consumed quantity at the scale of the
    /// recorded proceeds; the last slice takes the remainder so the rows add
    /// up to the recorded proceeds exactly.
    fn rows_for(record: &DisposalRecord, long_term_days: i64) -> Vec<DisposalReportRow> {
        let row = |bucket: HoldingBucket,
                   quantity: Decimal,
                   proceeds: Decimal,
                   cost_basis: Decimal| DisposalReportRow {
            source_event_id: record.source_event_id.clone(),
            asset: record.asset.clone(),
            disposed_at: record.disposed_at,
            bucket,
            quantity,
            proceeds,
            cost_basis,
            gain_or_loss: proceeds - cost_basis,
        };

        let consumed: Decimal = record.consumptions.iter().map(|c| c.quantity_consumed).sum();
        if consumed.is_zero() {
            return vec![row(
                HoldingBucket::Short,
                record.quantity,
                record.proceeds,
                record.cost_basis,
            )];
        }

        // (bucket, quantity, proceeds, cost) in order of first appearance
        let mut groups: Vec<(HoldingBucket, Decimal, Decimal, Decimal)> = Vec::with_capacity(2);
        let mut apportioned = Decimal::ZERO;
        let last = record.consumptions.len() - 1;
        let scale = record.proceeds.scale().max(2);

        for (i, slice) in record.consumptions.iter().enumerate() {
            let proceeds = if i == last {
                record.proceeds - apportioned
            } else {
                round_money(record.proceeds * slice.quantity_consumed / consumed, scale)
            };
            apportioned += proceeds;

            let bucket = HoldingBucket::for_days(slice.holding_period_days, long_term_days);
            match groups.iter_mut().find(|g| g.0 == bucket) {
                Some(group) => {
                    group.1 += slice.quantity_consumed;
                    group.2 += proceeds;
                    group.3 += slice.cost_basis;
                }
                None => groups.push((bucket, slice.quantity_consumed, proceeds, slice.cost_basis)),
            }
        }

        groups
            .into_iter()
            .map(|(bucket, quantity, proceeds, cost)| row(bucket, quantity, proceeds, cost))
            .collect()
    }
}
