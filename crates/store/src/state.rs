//! Per-tenant ledger state.

use std::collections::{BTreeMap, HashMap, HashSet};

use costbook_core::account::{Account, AccountRole};
use costbook_core::asset::Asset;
use costbook_core::disposal::DisposalRecord;
use costbook_core::fiscal::FiscalYear;
use costbook_core::journal::{ChangeSet, JournalEntry, MovementEvent, RecordedEvent};
use costbook_core::lot::{AcquisitionLot, LotReduction};
use costbook_core::repository::RepositoryError;
use costbook_shared::types::{AssetSymbol, LotId, SourceEventId};
use rust_decimal::Decimal;

/// Everything stored for one tenant.
#[derive(Debug, Clone, Default)]
pub(crate) struct TenantState {
    pub accounts: BTreeMap<AccountRole, Account>,
    pub fiscal_years: Vec<FiscalYear>,
    pub assets: BTreeMap<AssetSymbol, Asset>,
    pub lots: BTreeMap<AssetSymbol, Vec<AcquisitionLot>>,
    pub entries: HashMap<SourceEventId, JournalEntry>,
    pub events: Vec<RecordedEvent>,
    pub disposals: Vec<DisposalRecord>,
    recorded_sources: HashSet<SourceEventId>,
    last_sequence: u64,
}

impl TenantState {
    fn next_sequence(&mut self) -> u64 {
        self.last_sequence += 1;
        self.last_sequence
    }

    /// True if an entry or an event was already recorded for the source.
    fn has_source(&self, source: &SourceEventId) -> bool {
        self.entries.contains_key(source) || self.recorded_sources.contains(source)
    }

    fn has_lot(&self, lot: &AcquisitionLot) -> bool {
        self.lots
            .get(&lot.asset)
            .is_some_and(|lots| lots.iter().any(|existing| existing.id == lot.id))
    }

    /// Checks reductions against current remaining quantities.
    ///
    /// Several reductions of the same lot are summed before the check.
    pub fn validate_reductions(&self, reductions: &[LotReduction]) -> Result<(), RepositoryError> {
        let mut requested: HashMap<LotId, Decimal> = HashMap::new();
        for reduction in reductions {
            *requested.entry(reduction.lot_id).or_default() += reduction.quantity;
        }

        for reduction in reductions {
            let lot = self
                .lots
                .get(&reduction.asset)
                .and_then(|lots| lots.iter().find(|lot| lot.id == reduction.lot_id))
                .ok_or(RepositoryError::LotNotFound(reduction.lot_id))?;

            let total = requested
                .get(&reduction.lot_id)
                .copied()
                .unwrap_or_default();
            if total > lot.remaining_quantity {
                return Err(RepositoryError::LotOverdrawn {
                    lot_id: lot.id,
                    remaining: lot.remaining_quantity,
                    requested: total,
                });
            }
        }

        Ok(())
    }

    /// Applies reductions that already passed [`Self::validate_reductions`].
    pub fn apply_validated(&mut self, reductions: &[LotReduction]) {
        for reduction in reductions {
            if let Some(lot) = self
                .lots
                .get_mut(&reduction.asset)
                .and_then(|lots| lots.iter_mut().find(|lot| lot.id == reduction.lot_id))
            {
                lot.remaining_quantity -= reduction.quantity;
            }
        }
    }

    /// Appends an event, returning its sequence.
    fn record_event(&mut self, event: MovementEvent) -> u64 {
        let sequence = self.next_sequence();
        self.recorded_sources.insert(event.source_event_id.clone());
        self.events.push(RecordedEvent { sequence, event });
        sequence
    }

    /// Stores a lot created outside of a change set.
    pub fn insert_lot(
        &mut self,
        lot: AcquisitionLot,
        event: MovementEvent,
    ) -> Result<AcquisitionLot, RepositoryError> {
        if self.has_lot(&lot) {
            return Err(RepositoryError::DuplicateLot(lot.id));
        }
        if self.has_source(&event.source_event_id) {
            return Err(RepositoryError::DuplicateSource(event.source_event_id));
        }

        let sequence = self.record_event(event);
        let lot = lot.with_sequence(sequence);
        self.lots
            .entry(lot.asset.clone())
            .or_default()
            .push(lot.clone());
        Ok(lot)
    }

    /// Applies a change set all-or-nothing.
    ///
    /// Every check runs before the first mutation.
    pub fn commit(&mut self, change_set: ChangeSet) -> Result<JournalEntry, RepositoryError> {
        let ChangeSet {
            entry,
            new_lots,
            lot_reductions,
            disposals,
            event,
            new_assets,
            new_accounts,
        } = change_set;

        if self.has_source(&entry.source_event_id) {
            return Err(RepositoryError::DuplicateSource(entry.source_event_id));
        }

        let mut incoming = HashSet::new();
        for lot in &new_lots {
            if self.has_lot(lot) || !incoming.insert(lot.id) {
                return Err(RepositoryError::DuplicateLot(lot.id));
            }
        }

        self.validate_reductions(&lot_reductions)?;

        for account in &new_accounts {
            if let Some(existing) = self.accounts.get(&account.role)
                && existing.id != account.id
            {
                return Err(RepositoryError::AccountConflict(account.role));
            }
        }

        for asset in new_assets {
            self.assets.entry(asset.symbol.clone()).or_insert(asset);
        }
        for account in new_accounts {
            self.accounts.entry(account.role).or_insert(account);
        }
        self.apply_validated(&lot_reductions);
        let sequence = self.record_event(event);
        for lot in new_lots {
            self.lots
                .entry(lot.asset.clone())
                .or_default()
                .push(lot.with_sequence(sequence));
        }
        self.disposals.extend(disposals);
        self.entries
            .insert(entry.source_event_id.clone(), entry.clone());

        Ok(entry)
    }

    /// Records a disposal that carries no journal entry, all-or-nothing.
    pub fn record_disposal(
        &mut self,
        event: MovementEvent,
        reductions: &[LotReduction],
        record: DisposalRecord,
    ) -> Result<u64, RepositoryError> {
        if self.has_source(&event.source_event_id) {
            return Err(RepositoryError::DuplicateSource(event.source_event_id));
        }
        self.validate_reductions(reductions)?;

        self.apply_validated(reductions);
        self.disposals.push(record);
        Ok(self.record_event(event))
    }

    /// Swaps in rebuilt lots and disposal records of one asset.
    pub fn replace_asset(
        &mut self,
        symbol: &AssetSymbol,
        lots: Vec<AcquisitionLot>,
        disposals: Vec<DisposalRecord>,
    ) {
        self.lots.insert(symbol.clone(), lots);
        self.disposals.retain(|record| &record.asset != symbol);
        self.disposals.extend(disposals);
    }
}
