//! Chronological replay of the event log into scratch lot books.
//!
//! Used by purge-and-rebuild (one asset, whole history) and by
//! point-in-time positions (every asset, history up to an instant).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use costbook_shared::ShortfallPolicy;
use costbook_shared::types::AssetSymbol;

use crate::disposal::{DisposalError, DisposalRecord, DisposalRequest, allocate};
use crate::journal::RecordedEvent;
use crate::lot::{AcquisitionLot, LotBook};

/// Which part of the log to replay.
#[derive(Debug, Clone, Default)]
pub struct ReplayScope<'a> {
    /// Only this asset's lots; all assets when `None`.
    pub asset: Option<&'a AssetSymbol>,
    /// Only events that occurred at or before this instant.
    pub until: Option<DateTime<Utc>>,
}

impl ReplayScope<'_> {
    fn includes_asset(&self, asset: &AssetSymbol) -> bool {
        self.asset.is_none_or(|a| a == asset)
    }

    fn includes_time(&self, at: DateTime<Utc>) -> bool {
        self.until.is_none_or(|until| at <= until)
    }
}

/// Lot books and disposal records rebuilt from the log.
#[derive(Debug, Clone, Default)]
pub struct ReplayOutcome {
    /// Lot book per asset.
    pub books: BTreeMap<AssetSymbol, LotBook>,
    /// Recomputed disposals, in replay order.
    pub disposals: Vec<DisposalRecord>,
}

/// Replays recorded events in (occurred_at, sequence) order.
///
/// Shortfalls are always lenient here: every replayed event was accepted
/// when it arrived.
pub fn replay(
    events: &[RecordedEvent],
    scope: &ReplayScope<'_>,
) -> Result<ReplayOutcome, DisposalError> {
    let mut ordered: Vec<&RecordedEvent> = events
        .iter()
        .filter(|r| scope.includes_time(r.event.occurred_at))
        .collect();
    ordered.sort_by_key(|r| r.replay_key());

    let mut outcome = ReplayOutcome::default();

    for recorded in ordered {
        let event = &recorded.event;

        if let (Some(leg), Some(proceeds)) = (event.kind.disposed_leg(), event.kind.proceeds())
            && scope.includes_asset(&leg.asset)
        {
            let book = outcome.books.entry(leg.asset.clone()).or_default();
            let request = DisposalRequest {
                asset: leg.asset.clone(),
                quantity: leg.quantity,
                disposed_at: event.occurred_at,
                proceeds,
            };
            let result = allocate(book.lots(), &request, ShortfallPolicy::Lenient)?;
            book.apply(&result.reductions())?;
            outcome.disposals.push(DisposalRecord::from_result(
                event.tenant_id,
                event.source_event_id.clone(),
                result,
            ));
        }

        if let Some(leg) = event.kind.acquired_leg()
            && scope.includes_asset(&leg.asset)
        {
            let lot = AcquisitionLot::new(
                event.tenant_id,
                leg.asset.clone(),
                event.source_event_id.clone(),
                leg.quantity,
                leg.value,
                event.occurred_at,
            )?
            .with_sequence(recorded.sequence);
            outcome.books.entry(leg.asset.clone()).or_default().insert(lot);
        }
    }

    Ok(outcome)
}
