//! Persistence seam of the engine.
//!
//! The core crate owns no storage. Every service is generic over a
//! [`LedgerRepository`], implemented by the store crate.

use std::future::Future;

use costbook_shared::types::{AssetSymbol, LotId, SourceEventId, TenantId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::account::{Account, AccountRole};
use crate::asset::Asset;
use crate::disposal::DisposalRecord;
use crate::failure::FailureKind;
use crate::fiscal::FiscalYear;
use crate::journal::{ChangeSet, JournalEntry, MovementEvent, RecordedEvent};
use crate::lot::{AcquisitionLot, LotReduction};

/// Errors raised by a repository implementation.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The source event was already recorded.
    #[error("Source event already recorded: {0}")]
    DuplicateSource(SourceEventId),

    /// A lot with the same id is already stored.
    #[error("Lot already exists: {0}")]
    DuplicateLot(LotId),

    /// A lot referenced by a reduction does not exist.
    #[error("Lot not found: {0}")]
    LotNotFound(LotId),

    /// A reduction would take a lot below zero.
    #[error("Lot {lot_id} overdrawn: remaining {remaining}, requested {requested}")]
    LotOverdrawn {
        /// The lot.
        lot_id: LotId,
        /// Quantity left on the lot.
        remaining: Decimal,
        /// Quantity the reduction asked for.
        requested: Decimal,
    },

    /// The tenant got a different account for the role after resolution.
    #[error("Account for role {0} changed during generation")]
    AccountConflict(AccountRole),

    /// Backend failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl RepositoryError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateSource(_) => "DUPLICATE_SOURCE_EVENT",
            Self::DuplicateLot(_) => "DUPLICATE_LOT",
            Self::LotNotFound(_) => "LOT_NOT_FOUND",
            Self::LotOverdrawn { .. } => "LOT_OVERDRAWN",
            Self::AccountConflict(_) => "ACCOUNT_CONFLICT",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Classifies the failure.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::DuplicateSource(_)
            | Self::DuplicateLot(_)
            | Self::LotNotFound(_)
            | Self::LotOverdrawn { .. }
            | Self::AccountConflict(_) => FailureKind::InternalConsistency,
            Self::Storage(_) => FailureKind::Storage,
        }
    }
}

/// Repository trait for ledger persistence.
///
/// Implementations must make [`LedgerRepository::commit`],
/// [`LedgerRepository::record_disposal`] and
/// [`LedgerRepository::replace_asset_state`] all-or-nothing.
pub trait LedgerRepository: Send + Sync {
    // ========== Accounts ==========

    /// Find the tenant's account tagged with a role.
    fn find_account_by_role(
        &self,
        tenant_id: TenantId,
        role: AccountRole,
    ) -> impl Future<Output = Result<Option<Account>, RepositoryError>> + Send;

    /// Insert an account unless one with the same role exists; returns the stored one.
    fn insert_account(
        &self,
        account: Account,
    ) -> impl Future<Output = Result<Account, RepositoryError>> + Send;

    // ========== Fiscal years ==========

    /// List the tenant's fiscal years.
    fn list_fiscal_years(
        &self,
        tenant_id: TenantId,
    ) -> impl Future<Output = Result<Vec<FiscalYear>, RepositoryError>> + Send;

    // ========== Assets ==========

    /// Find a registered asset.
    fn find_asset(
        &self,
        tenant_id: TenantId,
        symbol: &AssetSymbol,
    ) -> impl Future<Output = Result<Option<Asset>, RepositoryError>> + Send;

    /// List every registered asset of a tenant, ordered by symbol.
    fn list_assets(
        &self,
        tenant_id: TenantId,
    ) -> impl Future<Output = Result<Vec<Asset>, RepositoryError>> + Send;

    /// Insert the asset unless it is already registered; returns the stored one.
    fn insert_asset_if_absent(
        &self,
        asset: Asset,
    ) -> impl Future<Output = Result<Asset, RepositoryError>> + Send;

    /// Insert or overwrite an asset definition.
    fn save_asset(&self, asset: Asset) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    // ========== Lots ==========

    /// List every lot (open or exhausted) of a (tenant, asset) pair.
    fn list_lots(
        &self,
        tenant_id: TenantId,
        symbol: &AssetSymbol,
    ) -> impl Future<Output = Result<Vec<AcquisitionLot>, RepositoryError>> + Send;

    /// Store a lot created outside an event, recording the acquisition
    /// so rebuilds reproduce it. Assigns the arrival sequence.
    fn insert_lot(
        &self,
        lot: AcquisitionLot,
        event: MovementEvent,
    ) -> impl Future<Output = Result<AcquisitionLot, RepositoryError>> + Send;

    /// Apply lot reductions atomically.
    fn apply_reductions(
        &self,
        tenant_id: TenantId,
        reductions: Vec<LotReduction>,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Record a disposal made outside journal generation: the event, its lot
    /// reductions and its disposal record, atomically.
    fn record_disposal(
        &self,
        event: MovementEvent,
        reductions: Vec<LotReduction>,
        record: DisposalRecord,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    // ========== Journal ==========

    /// Find the entry generated for a source event.
    fn find_entry_by_source(
        &self,
        tenant_id: TenantId,
        source_event_id: &SourceEventId,
    ) -> impl Future<Output = Result<Option<JournalEntry>, RepositoryError>> + Send;

    /// Commit everything one event produced, atomically.
    fn commit(
        &self,
        change_set: ChangeSet,
    ) -> impl Future<Output = Result<JournalEntry, RepositoryError>> + Send;

    /// List the recorded events of a tenant in arrival order.
    fn list_events(
        &self,
        tenant_id: TenantId,
    ) -> impl Future<Output = Result<Vec<RecordedEvent>, RepositoryError>> + Send;

    // ========== Disposals ==========

    /// List the disposal records of a tenant.
    fn list_disposals(
        &self,
        tenant_id: TenantId,
    ) -> impl Future<Output = Result<Vec<DisposalRecord>, RepositoryError>> + Send;

    /// Replace all lots and disposal records of one asset, atomically.
    fn replace_asset_state(
        &self,
        tenant_id: TenantId,
        symbol: &AssetSymbol,
        lots: Vec<AcquisitionLot>,
        disposals: Vec<DisposalRecord>,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}
