//! Read-only reporting view over a repository.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use costbook_shared::LedgerSettings;
use costbook_shared::types::{AssetSymbol, TenantId};
use rust_decimal::Decimal;
use tracing::debug;

use super::error::ReportError;
use super::service::ReportService;
use super::types::{DateRange, DisposalReport, Position, ValuedPosition};
use crate::repository::LedgerRepository;

/// Tax and portfolio reporting for a tenant. Never mutates.
pub struct ReportingView<R: LedgerRepository> {
    repo: Arc<R>,
    settings: LedgerSettings,
}

impl<R: LedgerRepository> ReportingView<R> {
    /// Create a new reporting view.
    #[must_use]
    pub fn new(repo: Arc<R>, settings: LedgerSettings) -> Self {
        Self { repo, settings }
    }

    /// Current positions, sorted by symbol, empty assets excluded.
    #[tracing::instrument(skip(self), fields(tenant_id = %tenant_id))]
    pub async fn positions(&self, tenant_id: TenantId) -> Result<Vec<Position>, ReportError> {
        let assets = self.repo.list_assets(tenant_id).await?;

        let mut lots_by_asset = Vec::with_capacity(assets.len());
        for asset in assets {
            let lots = self.repo.list_lots(tenant_id, &asset.symbol).await?;
            lots_by_asset.push((asset.symbol, lots));
        }

        let positions = ReportService::positions(lots_by_asset);
        debug!(count = positions.len(), "Positions aggregated");
        Ok(positions)
    }

    /// Current positions valued at the given unit prices.
    pub async fn valued_positions(
        &self,
        tenant_id: TenantId,
        prices: &HashMap<AssetSymbol, Decimal>,
    ) -> Result<Vec<ValuedPosition>, ReportError> {
        let positions = self.positions(tenant_id).await?;
        Ok(ReportService::valued_positions(positions, prices))
    }

    /// Realized gains for disposals between `start` and `end`, inclusive.
    #[tracing::instrument(skip(self), fields(tenant_id = %tenant_id))]
    pub async fn disposal_report(
        &self,
        tenant_id: TenantId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DisposalReport, ReportError> {
        let range = DateRange::new(start, end)?;
        let records = self.repo.list_disposals(tenant_id).await?;

        let report = ReportService::disposal_report(&records, range, self.settings.long_term_days);
        debug!(rows = report.entries.len(), "Disposal report generated");
        Ok(report)
    }
}
