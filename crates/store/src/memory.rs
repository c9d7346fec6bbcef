//! In-memory implementation of [`LedgerRepository`].

use std::collections::HashMap;

use costbook_core::account::{Account, AccountRole};
use costbook_core::asset::Asset;
use costbook_core::disposal::DisposalRecord;
use costbook_core::fiscal::FiscalYear;
use costbook_core::journal::{ChangeSet, JournalEntry, MovementEvent, RecordedEvent};
use costbook_core::lot::{AcquisitionLot, LotReduction};
use costbook_core::repository::{LedgerRepository, RepositoryError};
use costbook_shared::types::{AssetSymbol, SourceEventId, TenantId};
use tokio::sync::RwLock;
use tracing::{debug, error};

use crate::state::TenantState;

/// Ledger repository keeping every tenant in process memory.
///
/// A change set is applied under one write lock after all of its checks
/// pass, so readers never observe half of a commit.
#[derive(Debug, Default)]
pub struct InMemoryLedgerRepository {
    tenants: RwLock<HashMap<TenantId, TenantState>>,
}

impl InMemoryLedgerRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fiscal year for a tenant.
    pub async fn add_fiscal_year(&self, year: FiscalYear) {
        let mut tenants = self.tenants.write().await;
        tenants
            .entry(year.tenant_id)
            .or_default()
            .fiscal_years
            .push(year);
    }

    /// Close every fiscal year of a tenant containing `name`.
    pub async fn close_fiscal_year(&self, tenant_id: TenantId, name: &str) {
        let mut tenants = self.tenants.write().await;
        if let Some(state) = tenants.get_mut(&tenant_id) {
            for year in state.fiscal_years.iter_mut().filter(|y| y.name == name) {
                year.is_closed = true;
            }
        }
    }

    /// Number of journal entries booked for a tenant.
    pub async fn entry_count(&self, tenant_id: TenantId) -> usize {
        self.tenants
            .read()
            .await
            .get(&tenant_id)
            .map_or(0, |state| state.entries.len())
    }

    /// Every journal entry of a tenant, in booking order.
    pub async fn list_entries(&self, tenant_id: TenantId) -> Vec<JournalEntry> {
        let tenants = self.tenants.read().await;
        let Some(state) = tenants.get(&tenant_id) else {
            return Vec::new();
        };

        let order: HashMap<&SourceEventId, u64> = state
            .events
            .iter()
            .map(|recorded| (&recorded.event.source_event_id, recorded.sequence))
            .collect();
        let mut entries: Vec<JournalEntry> = state.entries.values().cloned().collect();
        entries.sort_by_key(|entry| order.get(&entry.source_event_id).copied());
        entries
    }

    /// Every account of a tenant.
    pub async fn list_accounts(&self, tenant_id: TenantId) -> Vec<Account> {
        self.tenants
            .read()
            .await
            .get(&tenant_id)
            .map(|state| state.accounts.values().cloned().collect())
            .unwrap_or_default()
    }
}

impl LedgerRepository for InMemoryLedgerRepository {
    // ========== Accounts ==========

    async fn find_account_by_role(
        &self,
        tenant_id: TenantId,
        role: AccountRole,
    ) -> Result<Option<Account>, RepositoryError> {
        Ok(self
            .tenants
            .read()
            .await
            .get(&tenant_id)
            .and_then(|state| state.accounts.get(&role).cloned()))
    }

    async fn insert_account(&self, account: Account) -> Result<Account, RepositoryError> {
        let mut tenants = self.tenants.write().await;
        let state = tenants.entry(account.tenant_id).or_default();
        Ok(state
            .accounts
            .entry(account.role)
            .or_insert(account)
            .clone())
    }

    // ========== Fiscal years ==========

    async fn list_fiscal_years(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<FiscalYear>, RepositoryError> {
        Ok(self
            .tenants
            .read()
            .await
            .get(&tenant_id)
            .map(|state| state.fiscal_years.clone())
            .unwrap_or_default())
    }

    // ========== Assets ==========

    async fn find_asset(
        &self,
        tenant_id: TenantId,
        symbol: &AssetSymbol,
    ) -> Result<Option<Asset>, RepositoryError> {
        Ok(self
            .tenants
            .read()
            .await
            .get(&tenant_id)
            .and_then(|state| state.assets.get(symbol).cloned()))
    }

    async fn list_assets(&self, tenant_id: TenantId) -> Result<Vec<Asset>, RepositoryError> {
        Ok(self
            .tenants
            .read()
            .await
            .get(&tenant_id)
            .map(|state| state.assets.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn insert_asset_if_absent(&self, asset: Asset) -> Result<Asset, RepositoryError> {
        let mut tenants = self.tenants.write().await;
        let state = tenants.entry(asset.tenant_id).or_default();
        Ok(state
            .assets
            .entry(asset.symbol.clone())
            .or_insert(asset)
            .clone())
    }

    async fn save_asset(&self, asset: Asset) -> Result<(), RepositoryError> {
        let mut tenants = self.tenants.write().await;
        tenants
            .entry(asset.tenant_id)
            .or_default()
            .assets
            .insert(asset.symbol.clone(), asset);
        Ok(())
    }

    // ========== Lots ==========

    async fn list_lots(
        &self,
        tenant_id: TenantId,
        symbol: &AssetSymbol,
    ) -> Result<Vec<AcquisitionLot>, RepositoryError> {
        Ok(self
            .tenants
            .read()
            .await
            .get(&tenant_id)
            .and_then(|state| state.lots.get(symbol).cloned())
            .unwrap_or_default())
    }

    async fn insert_lot(
        &self,
        lot: AcquisitionLot,
        event: MovementEvent,
    ) -> Result<AcquisitionLot, RepositoryError> {
        let mut tenants = self.tenants.write().await;
        tenants.entry(lot.tenant_id).or_default().insert_lot(lot, event)
    }

    async fn apply_reductions(
        &self,
        tenant_id: TenantId,
        reductions: Vec<LotReduction>,
    ) -> Result<(), RepositoryError> {
        let mut tenants = self.tenants.write().await;
        let state = tenants.entry(tenant_id).or_default();

        if let Err(err) = state.validate_reductions(&reductions) {
            error!(tenant_id = %tenant_id, error = %err, "Lot reductions rejected");
            return Err(err);
        }
        state.apply_validated(&reductions);
        Ok(())
    }

    async fn record_disposal(
        &self,
        event: MovementEvent,
        reductions: Vec<LotReduction>,
        record: DisposalRecord,
    ) -> Result<(), RepositoryError> {
        let tenant_id = event.tenant_id;
        let mut tenants = self.tenants.write().await;

        match tenants
            .entry(tenant_id)
            .or_default()
            .record_disposal(event, &reductions, record)
        {
            Ok(sequence) => {
                debug!(tenant_id = %tenant_id, sequence, "Disposal recorded");
                Ok(())
            }
            Err(err) => {
                error!(tenant_id = %tenant_id, error = %err, "Disposal rejected");
                Err(err)
            }
        }
    }

    // ========== Journal ==========

    async fn find_entry_by_source(
        &self,
        tenant_id: TenantId,
        source_event_id: &SourceEventId,
    ) -> Result<Option<JournalEntry>, RepositoryError> {
        Ok(self
            .tenants
            .read()
            .await
            .get(&tenant_id)
            .and_then(|state| state.entries.get(source_event_id).cloned()))
    }

    async fn commit(&self, change_set: ChangeSet) -> Result<JournalEntry, RepositoryError> {
        let tenant_id = change_set.entry.tenant_id;
        let mut tenants = self.tenants.write().await;

        match tenants.entry(tenant_id).or_default().commit(change_set) {
            Ok(entry) => {
                debug!(tenant_id = %tenant_id, entry_id = %entry.id, "Change set committed");
                Ok(entry)
            }
            Err(err) => {
                error!(tenant_id = %tenant_id, error = %err, "Change set rejected");
                Err(err)
            }
        }
    }

    async fn list_events(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<RecordedEvent>, RepositoryError> {
        Ok(self
            .tenants
            .read()
            .await
            .get(&tenant_id)
            .map(|state| state.events.clone())
            .unwrap_or_default())
    }

    // ========== Disposals ==========

    async fn list_disposals(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<DisposalRecord>, RepositoryError> {
        Ok(self
            .tenants
            .read()
            .await
            .get(&tenant_id)
            .map(|state| state.disposals.clone())
            .unwrap_or_default())
    }

    async fn replace_asset_state(
        &self,
        tenant_id: TenantId,
        symbol: &AssetSymbol,
        lots: Vec<AcquisitionLot>,
        disposals: Vec<DisposalRecord>,
    ) -> Result<(), RepositoryError> {
        let mut tenants = self.tenants.write().await;
        tenants
            .entry(tenant_id)
            .or_default()
            .replace_asset(symbol, lots, disposals);
        Ok(())
    }
}
