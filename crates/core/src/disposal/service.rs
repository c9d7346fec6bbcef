//! Disposal calculator service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use costbook_shared::LedgerSettings;
use costbook_shared::types::{AssetSymbol, SourceEventId, TenantId};
use rust_decimal::Decimal;
use tracing::info;

use super::error::DisposalError;
use super::fifo::allocate;
use super::types::{DisposalRecord, DisposalRequest, DisposalResult};
use crate::journal::{AssetLeg, MovementEvent, MovementKind};
use crate::locks::LedgerLocks;
use crate::repository::LedgerRepository;

/// Applies FIFO disposals directly to the lot books.
///
/// Journal generation does its own allocation inside a change set; this
/// service is the standalone entry point for disposals that carry no entry.
pub struct DisposalCalculator<R: LedgerRepository> {
    repo: Arc<R>,
    locks: Arc<LedgerLocks>,
    settings: LedgerSettings,
}

impl<R: LedgerRepository> DisposalCalculator<R> {
    /// Create a new disposal calculator.
    #[must_use]
    pub fn new(repo: Arc<R>, locks: Arc<LedgerLocks>, settings: LedgerSettings) -> Self {
        Self {
            repo,
            locks,
            settings,
        }
    }

    /// Dispose of `quantity` units, oldest lots first.
    ///
    /// The disposal is recorded under `source_event_id` in the event log,
    /// together with its lot reductions and disposal record, so reports see
    /// it and a rebuild reproduces it. Holds the source lock, then the asset
    /// lock, until everything is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Quantity or proceeds are negative
    /// - Quantity exceeds the asset precision
    /// - Lots do not cover the quantity and the shortfall policy is `reject`
    /// - The source event was already recorded
    #[tracing::instrument(
        skip(self),
        fields(tenant_id = %tenant_id, asset = %asset, source_event_id = %source_event_id)
    )]
    pub async fn consume(
        &self,
        tenant_id: TenantId,
        asset: AssetSymbol,
        source_event_id: SourceEventId,
        quantity: Decimal,
        disposed_at: DateTime<Utc>,
        proceeds: Decimal,
    ) -> Result<DisposalResult, DisposalError> {
        let _source_guard = self
            .locks
            .sources
            .lock((tenant_id, source_event_id.clone()))
            .await;
        let _asset_guard = self.locks.assets.lock((tenant_id, asset.clone())).await;

        if let Some(definition) = self.repo.find_asset(tenant_id, &asset).await? {
            definition.check_quantity(quantity)?;
        }

        let lots = self.repo.list_lots(tenant_id, &asset).await?;
        let request = DisposalRequest {
            asset: asset.clone(),
            quantity,
            disposed_at,
            proceeds,
        };
        let result = allocate(&lots, &request, self.settings.shortfall_policy)?;

        let event = MovementEvent {
            tenant_id,
            source_event_id: source_event_id.clone(),
            occurred_at: disposed_at,
            kind: MovementKind::Disposal {
                leg: AssetLeg::new(asset, quantity, proceeds),
            },
            fee: None,
        };
        let record = DisposalRecord::from_result(tenant_id, source_event_id, result.clone());
        self.repo
            .record_disposal(event, result.reductions(), record)
            .await?;

        info!(
            consumed = %result.consumed_quantity(),
            cost_basis = %result.total_cost_basis,
            realized = %result.realized_gain_or_loss,
            "Disposal applied"
        );

        Ok(result)
    }
}
