//! Journal entry generator service.

use std::sync::Arc;

use costbook_shared::LedgerSettings;
use costbook_shared::types::JournalEntryId;
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::changeset::{ChangeSet, GenerationOutcome};
use super::entry::{EntryStatus, JournalEntry};
use super::error::JournalError;
use super::event::MovementEvent;
use super::recipe::{DraftLine, bind_lines, draft_lines, required_roles};
use crate::account::{Account, AccountResolver, AccountSet, ResolvedAccount};
use crate::asset::Asset;
use crate::disposal::{DisposalRecord, DisposalRequest, allocate};
use crate::fiscal::find_open_year;
use crate::guard::{IdempotencyGuard, verify_balanced};
use crate::locks::LedgerLocks;
use crate::lot::AcquisitionLot;
use crate::repository::LedgerRepository;

/// Turns movement events into balanced journal entries.
///
/// Generation is idempotent per (tenant, source event): a second request
/// for the same event returns the entry booked by the first.
pub struct JournalGenerator<R: LedgerRepository> {
    repo: Arc<R>,
    locks: Arc<LedgerLocks>,
    settings: LedgerSettings,
    accounts: AccountResolver<R>,
    guard: IdempotencyGuard<R>,
}

impl<R: LedgerRepository> JournalGenerator<R> {
    /// Create a new journal generator.
    #[must_use]
    pub fn new(repo: Arc<R>, locks: Arc<LedgerLocks>, settings: LedgerSettings) -> Self {
        Self {
            accounts: AccountResolver::new(Arc::clone(&repo)),
            guard: IdempotencyGuard::new(Arc::clone(&repo)),
            repo,
            locks,
            settings,
        }
    }

    /// Generate and commit the entry for an event.
    ///
    /// The entry, its lot changes, the disposal record and the event itself
    /// are committed together or not at all.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The event carries negative figures or is structurally invalid
    /// - No open fiscal year covers the event date
    /// - A quantity exceeds the asset precision
    /// - A system account cannot be resolved
    /// - The generated lines do not balance
    /// - The repository rejects the change set
    #[tracing::instrument(
        skip_all,
        fields(
            tenant_id = %event.tenant_id,
            source_event_id = %event.source_event_id,
            kind = event.kind.name(),
        )
    )]
    pub async fn generate(&self, event: MovementEvent) -> Result<GenerationOutcome, JournalError> {
        event.validate()?;
        let tenant_id = event.tenant_id;

        let _source_guard = self
            .locks
            .sources
            .lock((tenant_id, event.source_event_id.clone()))
            .await;

        if let Some(entry) = self.guard.existing(tenant_id, &event.source_event_id).await? {
            debug!(entry_id = %entry.id, "Event already booked");
            return Ok(GenerationOutcome::Existing(entry));
        }

        let date = event.date();
        let years = self.repo.list_fiscal_years(tenant_id).await?;
        let fiscal_year_id = find_open_year(&years, date)
            .map(|year| year.id)
            .ok_or(JournalError::NoOpenPeriod(date))?;

        let _asset_guards = self
            .locks
            .assets
            .lock_many(
                event
                    .lot_assets()
                    .into_iter()
                    .map(|asset| (tenant_id, asset)),
            )
            .await;

        let new_assets = self.check_precision(&event).await?;

        // Disposed leg: FIFO against the current lots.
        let mut lot_reductions = Vec::new();
        let mut disposals = Vec::new();
        let mut cost_basis = Decimal::ZERO;
        if let (Some(leg), Some(proceeds)) = (event.kind.disposed_leg(), event.kind.proceeds()) {
            let lots = self.repo.list_lots(tenant_id, &leg.asset).await?;
            let request = DisposalRequest {
                asset: leg.asset.clone(),
                quantity: leg.quantity,
                disposed_at: event.occurred_at,
                proceeds,
            };
            let result = allocate(&lots, &request, self.settings.shortfall_policy)?;
            cost_basis = result.total_cost_basis;
            lot_reductions = result.reductions();
            disposals.push(DisposalRecord::from_result(
                tenant_id,
                event.source_event_id.clone(),
                result,
            ));
        }

        // Acquired leg: a new lot at the leg's value.
        let new_lots = match event.kind.acquired_leg() {
            Some(leg) => vec![AcquisitionLot::new(
                tenant_id,
                leg.asset.clone(),
                event.source_event_id.clone(),
                leg.quantity,
                leg.value,
                event.occurred_at,
            )?],
            None => Vec::new(),
        };

        let drafts = draft_lines(&event, cost_basis, self.settings.reporting_currency);
        let (accounts, new_accounts) = self.resolve_accounts(&event, &drafts).await?;
        let lines = bind_lines(drafts, &accounts)?;
        let totals = verify_balanced(&lines)?;

        let entry = JournalEntry {
            id: JournalEntryId::new(),
            tenant_id,
            fiscal_year_id,
            source_event_id: event.source_event_id.clone(),
            date,
            description: event.describe(),
            currency: self.settings.reporting_currency,
            status: EntryStatus::Draft,
            lines,
        };

        let entry = self
            .repo
            .commit(ChangeSet {
                entry,
                new_lots,
                lot_reductions,
                disposals,
                event,
                new_assets,
                new_accounts,
            })
            .await?;

        info!(
            entry_id = %entry.id,
            lines = entry.lines.len(),
            total = %totals.debit,
            "Journal entry generated"
        );

        Ok(GenerationOutcome::Created(entry))
    }

    /// Checks every asset quantity on the event against its precision.
    ///
    /// A lot asset seen for the first time is checked against the default
    /// precision and returned for the commit to define. A fee in an unknown
    /// asset is not checked.
    async fn check_precision(&self, event: &MovementEvent) -> Result<Vec<Asset>, JournalError> {
        let tenant_id = event.tenant_id;
        let mut planned: Vec<Asset> = Vec::new();

        for leg in event.kind.legs() {
            let asset = match self.repo.find_asset(tenant_id, &leg.asset).await? {
                Some(asset) => Some(asset),
                None if event.touches_lots_of(&leg.asset) => {
                    let asset = Asset::new(
                        tenant_id,
                        leg.asset.clone(),
                        self.settings.default_asset_precision,
                    );
                    if !planned.iter().any(|known| known.symbol == asset.symbol) {
                        planned.push(asset.clone());
                    }
                    Some(asset)
                }
                None => None,
            };
            if let Some(asset) = asset {
                asset.check_quantity(leg.quantity)?;
            }
        }

        if let Some(fee) = &event.fee
            && let Some(asset) = self.repo.find_asset(tenant_id, &fee.asset).await?
        {
            asset.check_quantity(fee.quantity)?;
        }

        Ok(planned)
    }

    /// Resolves every role the lines need, returning the system accounts
    /// the commit has to create.
    async fn resolve_accounts(
        &self,
        event: &MovementEvent,
        drafts: &[DraftLine],
    ) -> Result<(AccountSet, Vec<Account>), JournalError> {
        let mut accounts = AccountSet::new();
        let mut planned = Vec::new();
        for role in required_roles(drafts) {
            let resolved = self
                .accounts
                .resolve(event.tenant_id, role)
                .await
                .map_err(|err| JournalError::AccountUnavailable {
                    role,
                    reason: err.to_string(),
                })?;
            accounts.insert(resolved.account().clone());
            if let ResolvedAccount::Planned(account) = resolved {
                planned.push(account);
            }
        }
        Ok((accounts, planned))
    }
}
