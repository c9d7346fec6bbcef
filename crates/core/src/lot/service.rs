//! Lot ledger service.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use costbook_shared::LedgerSettings;
use costbook_shared::types::{AssetSymbol, LotId, SourceEventId, TenantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::book::LotBook;
use super::error::LotError;
use super::types::{AcquisitionLot, LotReduction};
use crate::asset::Asset;
use crate::disposal::DisposalError;
use crate::journal::{AssetLeg, MovementEvent, MovementKind};
use crate::locks::LedgerLocks;
use crate::replay::{ReplayScope, replay};
use crate::reports::{Position, ReportService};
use crate::repository::{LedgerRepository, RepositoryError};

/// Outcome of [`LotLedger::purge_and_rebuild`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebuildSummary {
    /// Asset that was rebuilt.
    pub asset: AssetSymbol,
    /// Lots now on the books, exhausted ones included.
    pub lots_rebuilt: usize,
    /// Disposals recomputed.
    pub disposals_replayed: usize,
    /// Disposals whose recomputed cost basis differs from the recorded one.
    pub drifted: Vec<SourceEventId>,
}

/// Owns the lots of every (tenant, asset) pair.
///
/// Mutations take the asset lock from the shared [`LedgerLocks`].
pub struct LotLedger<R: LedgerRepository> {
    repo: Arc<R>,
    locks: Arc<LedgerLocks>,
    settings: LedgerSettings,
}

impl<R: LedgerRepository> LotLedger<R> {
    /// Create a new lot ledger.
    #[must_use]
    pub fn new(repo: Arc<R>, locks: Arc<LedgerLocks>, settings: LedgerSettings) -> Self {
        Self {
            repo,
            locks,
            settings,
        }
    }

    /// Define an asset or change its precision.
    ///
    /// # Errors
    ///
    /// Returns [`LotError::AssetImmutable`] if the precision changes after
    /// lots were created.
    #[tracing::instrument(skip(self), fields(tenant_id = %tenant_id, asset = %symbol))]
    pub async fn register_asset(
        &self,
        tenant_id: TenantId,
        symbol: AssetSymbol,
        precision: u32,
    ) -> Result<Asset, LotError> {
        let _guard = self.locks.assets.lock((tenant_id, symbol.clone())).await;

        if let Some(existing) = self.repo.find_asset(tenant_id, &symbol).await? {
            let has_lots = !self.repo.list_lots(tenant_id, &symbol).await?.is_empty();
            existing.check_redefinition(precision, has_lots)?;
            if existing.precision == precision {
                return Ok(existing);
            }
        }

        let asset = Asset::new(tenant_id, symbol, precision);
        self.repo.save_asset(asset.clone()).await?;
        info!(precision, "Asset registered");
        Ok(asset)
    }

    /// Returns the asset, defining it with the default precision on first use.
    pub async fn ensure_asset(
        &self,
        tenant_id: TenantId,
        symbol: &AssetSymbol,
    ) -> Result<Asset, RepositoryError> {
        self.repo
            .insert_asset_if_absent(Asset::new(
                tenant_id,
                symbol.clone(),
                self.settings.default_asset_precision,
            ))
            .await
    }

    /// Create a lot outside of journal generation.
    ///
    /// The acquisition is appended to the event log so that a rebuild
    /// reproduces the lot.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Quantity or cost is negative
    /// - Quantity exceeds the asset precision
    /// - A lot already exists for the source event and asset
    #[tracing::instrument(skip(self), fields(tenant_id = %tenant_id, asset = %asset))]
    pub async fn create_lot(
        &self,
        tenant_id: TenantId,
        asset: AssetSymbol,
        source_event_id: SourceEventId,
        quantity: Decimal,
        total_cost: Decimal,
        acquired_at: DateTime<Utc>,
    ) -> Result<AcquisitionLot, LotError> {
        let lot = AcquisitionLot::new(
            tenant_id,
            asset.clone(),
            source_event_id.clone(),
            quantity,
            total_cost,
            acquired_at,
        )?;

        let _guard = self.locks.assets.lock((tenant_id, asset.clone())).await;

        self.ensure_asset(tenant_id, &asset)
            .await?
            .check_quantity(quantity)?;

        let event = MovementEvent {
            tenant_id,
            source_event_id,
            occurred_at: acquired_at,
            kind: MovementKind::Acquisition {
                leg: AssetLeg::new(asset, quantity, total_cost),
            },
            fee: None,
        };
        let lot = self.repo.insert_lot(lot, event).await?;

        debug!(lot_id = %lot.id, sequence = lot.sequence, "Lot created");
        Ok(lot)
    }

    /// Lots of one asset, oldest first.
    ///
    /// Exhausted lots are left out unless `include_exhausted` is set.
    pub async fn list_open_lots(
        &self,
        tenant_id: TenantId,
        asset: &AssetSymbol,
        include_exhausted: bool,
    ) -> Result<Vec<AcquisitionLot>, LotError> {
        let mut lots: Vec<AcquisitionLot> = self
            .repo
            .list_lots(tenant_id, asset)
            .await?
            .into_iter()
            .filter(|lot| include_exhausted || lot.is_open())
            .collect();
        lots.sort_by_key(AcquisitionLot::fifo_key);
        Ok(lots)
    }

    /// Take `amount` units off one lot.
    ///
    /// Direct reductions are not part of the event log; a rebuild restores
    /// the lot to what the recorded events imply.
    ///
    /// # Errors
    ///
    /// Returns [`LotError::LotOverdrawn`] if the lot holds less than `amount`.
    #[tracing::instrument(skip(self), fields(tenant_id = %tenant_id, asset = %asset))]
    pub async fn reduce_lot(
        &self,
        tenant_id: TenantId,
        asset: AssetSymbol,
        lot_id: LotId,
        amount: Decimal,
    ) -> Result<AcquisitionLot, LotError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(LotError::InvalidQuantity(amount));
        }

        let _guard = self.locks.assets.lock((tenant_id, asset.clone())).await;

        let mut book = LotBook::from_lots(self.repo.list_lots(tenant_id, &asset).await?);
        if let Err(err) = book.reduce(lot_id, amount) {
            error!(lot_id = %lot_id, error = %err, "Lot reduction rejected");
            return Err(err);
        }
        let lot = book.get(lot_id).cloned().ok_or(LotError::LotNotFound(lot_id))?;

        self.repo
            .apply_reductions(
                tenant_id,
                vec![LotReduction {
                    asset,
                    lot_id,
                    quantity: amount,
                }],
            )
            .await?;

        debug!(lot_id = %lot_id, remaining = %lot.remaining_quantity, "Lot reduced");
        Ok(lot)
    }

    /// Current position in one asset.
    pub async fn position(
        &self,
        tenant_id: TenantId,
        asset: &AssetSymbol,
    ) -> Result<Position, LotError> {
        let lots = self.repo.list_lots(tenant_id, asset).await?;
        Ok(Position::from_lots(asset.clone(), &lots))
    }

    /// Positions as they stood at `at`, replayed from the event log.
    ///
    /// Nothing is mutated.
    #[tracing::instrument(skip(self), fields(tenant_id = %tenant_id))]
    pub async fn positions_as_of(
        &self,
        tenant_id: TenantId,
        at: DateTime<Utc>,
    ) -> Result<Vec<Position>, DisposalError> {
        let events = self.repo.list_events(tenant_id).await?;
        let scope = ReplayScope {
            asset: None,
            until: Some(at),
        };
        let outcome = replay(&events, &scope)?;

        Ok(ReportService::positions(
            outcome
                .books
                .into_iter()
                .map(|(asset, book)| (asset, book.into_lots())),
        ))
    }

    /// Delete every lot of the asset and rebuild them from the event log.
    ///
    /// Disposal records of the asset are recomputed too. Journal entries are
    /// left alone; a disposal whose cost basis changed is reported as drift.
    /// Running it twice in a row gives the same state.
    #[tracing::instrument(skip(self), fields(tenant_id = %tenant_id, asset = %asset))]
    pub async fn purge_and_rebuild(
        &self,
        tenant_id: TenantId,
        asset: AssetSymbol,
    ) -> Result<RebuildSummary, DisposalError> {
        let _guard = self.locks.assets.lock((tenant_id, asset.clone())).await;

        let events = self.repo.list_events(tenant_id).await?;
        let recorded: HashMap<SourceEventId, Decimal> = self
            .repo
            .list_disposals(tenant_id)
            .await?
            .into_iter()
            .filter(|record| record.asset == asset)
            .map(|record| (record.source_event_id, record.cost_basis))
            .collect();

        let scope = ReplayScope {
            asset: Some(&asset),
            until: None,
        };
        let mut outcome = replay(&events, &scope)?;

        let lots = outcome
            .books
            .remove(&asset)
            .map(LotBook::into_lots)
            .unwrap_or_default();

        let mut drifted = Vec::new();
        for record in &outcome.disposals {
            if let Some(previous) = recorded.get(&record.source_event_id)
                && *previous != record.cost_basis
            {
                warn!(
                    source_event_id = %record.source_event_id,
                    recorded = %previous,
                    rebuilt = %record.cost_basis,
                    "Cost basis drift after rebuild"
                );
                drifted.push(record.source_event_id.clone());
            }
        }

        let summary = RebuildSummary {
            asset: asset.clone(),
            lots_rebuilt: lots.len(),
            disposals_replayed: outcome.disposals.len(),
            drifted,
        };

        self.repo
            .replace_asset_state(tenant_id, &asset, lots, outcome.disposals)
            .await?;

        info!(
            lots = summary.lots_rebuilt,
            disposals = summary.disposals_replayed,
            drifted = summary.drifted.len(),
            "Asset rebuilt from event log"
        );

        Ok(summary)
    }
}
