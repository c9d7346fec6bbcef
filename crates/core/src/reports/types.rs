//! Report data types.

use chrono::{DateTime, NaiveDate, Utc};
use costbook_shared::types::{AssetSymbol, SourceEventId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ReportError;
use crate::lot::AcquisitionLot;

// ============================================================================
// Positions
// ============================================================================

/// Aggregate holding of one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Asset held.
    pub asset: AssetSymbol,
    /// Units across open lots.
    pub total_remaining_quantity: Decimal,
    /// Cost of those units.
    pub total_cost_basis: Decimal,
    /// Cost basis per unit; zero for an empty position.
    pub average_unit_cost: Decimal,
}

impl Position {
    /// Aggregates lots of one asset.
    #[must_use]
    pub fn from_lots<'a>(
        asset: AssetSymbol,
        lots: impl IntoIterator<Item = &'a AcquisitionLot>,
    ) -> Self {
        let (quantity, cost) = lots
            .into_iter()
            .filter(|lot| lot.is_open())
            .fold((Decimal::ZERO, Decimal::ZERO), |(q, c), lot| {
                (q + lot.remaining_quantity, c + lot.remaining_cost())
            });

        Self {
            asset,
            total_remaining_quantity: quantity,
            total_cost_basis: cost,
            average_unit_cost: if quantity.is_zero() {
                Decimal::ZERO
            } else {
                cost / quantity
            },
        }
    }

    /// Returns true if nothing is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_remaining_quantity.is_zero()
    }
}

/// A position valued at a caller-supplied unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuedPosition {
    /// The position.
    #[serde(flatten)]
    pub position: Position,
    /// Unit price used, if one was supplied.
    pub unit_price: Option<Decimal>,
    /// `quantity * unit_price`.
    pub current_value: Option<Decimal>,
    /// `current_value - total_cost_basis`.
    pub unrealized_gain_or_loss: Option<Decimal>,
}

// ============================================================================
// Disposal report
// ============================================================================

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day.
    pub start: NaiveDate,
    /// Last day.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ReportError> {
        if start > end {
            return Err(ReportError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns true if the date falls in the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Tax holding-period bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoldingBucket {
    /// Held less than the long-term threshold.
    Short,
    /// Held at least the long-term threshold.
    Long,
}

impl HoldingBucket {
    /// Classifies a holding period.
    #[must_use]
    pub fn for_days(holding_period_days: i64, long_term_days: i64) -> Self {
        if holding_period_days >= long_term_days {
            Self::Long
        } else {
            Self::Short
        }
    }
}

/// One (disposal, bucket) row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisposalReportRow {
    /// Event that disposed of the asset.
    pub source_event_id: SourceEventId,
    /// Asset disposed of.
    pub asset: AssetSymbol,
    /// Disposal timestamp.
    pub disposed_at: DateTime<Utc>,
    /// Holding bucket of the slices in this row.
    pub bucket: HoldingBucket,
    /// Units in this row.
    pub quantity: Decimal,
    /// Proceeds apportioned to this row.
    pub proceeds: Decimal,
    /// Cost basis of the slices in this row.
    pub cost_basis: Decimal,
    /// `proceeds - cost_basis`.
    pub gain_or_loss: Decimal,
}

/// Report totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisposalReportTotals {
    /// Sum of proceeds.
    pub total_proceeds: Decimal,
    /// Sum of cost basis.
    pub total_cost_basis: Decimal,
    /// Sum of gains and losses.
    pub total_gain_loss: Decimal,
    /// Gains and losses of short-term rows.
    pub short_term_gain_loss: Decimal,
    /// Gains and losses of long-term rows.
    pub long_term_gain_loss: Decimal,
}

/// Realized gains over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisposalReport {
    /// Range covered.
    pub range: DateRange,
    /// Long-term threshold used, in days.
    pub long_term_days: i64,
    /// Rows ordered by disposal time.
    pub entries: Vec<DisposalReportRow>,
    /// Totals.
    pub totals: DisposalReportTotals,
}
