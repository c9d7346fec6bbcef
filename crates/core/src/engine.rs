//! Engine facade wiring every service over one repository.

use std::sync::Arc;

use costbook_shared::{AppConfig, LedgerSettings};

use crate::disposal::DisposalCalculator;
use crate::journal::{GenerationOutcome, JournalError, JournalGenerator, MovementEvent};
use crate::locks::LedgerLocks;
use crate::lot::LotLedger;
use crate::reports::ReportingView;
use crate::repository::LedgerRepository;

/// The cost-basis ledger and journal engine.
///
/// All services share one repository and one set of lock registries, so
/// generation, direct lot mutation and rebuilds serialize on the same keys.
pub struct CostbookEngine<R: LedgerRepository> {
    settings: LedgerSettings,
    locks: Arc<LedgerLocks>,
    lots: LotLedger<R>,
    disposals: DisposalCalculator<R>,
    journal: JournalGenerator<R>,
    reports: ReportingView<R>,
}

impl<R: LedgerRepository> CostbookEngine<R> {
    /// Create an engine with explicit settings.
    #[must_use]
    pub fn new(repo: Arc<R>, settings: LedgerSettings) -> Self {
        let locks = Arc::new(LedgerLocks::new());
        Self {
            lots: LotLedger::new(Arc::clone(&repo), Arc::clone(&locks), settings.clone()),
            disposals: DisposalCalculator::new(
                Arc::clone(&repo),
                Arc::clone(&locks),
                settings.clone(),
            ),
            journal: JournalGenerator::new(
                Arc::clone(&repo),
                Arc::clone(&locks),
                settings.clone(),
            ),
            reports: ReportingView::new(repo, settings.clone()),
            locks,
            settings,
        }
    }

    /// Create an engine from loaded application config.
    #[must_use]
    pub fn from_config(repo: Arc<R>, config: &AppConfig) -> Self {
        Self::new(repo, config.ledger.clone())
    }

    /// Active ledger settings.
    #[must_use]
    pub fn settings(&self) -> &LedgerSettings {
        &self.settings
    }

    /// Lock registries shared by the services.
    #[must_use]
    pub fn locks(&self) -> &LedgerLocks {
        &self.locks
    }

    /// Lot ledger.
    #[must_use]
    pub fn lots(&self) -> &LotLedger<R> {
        &self.lots
    }

    /// Standalone FIFO disposals.
    #[must_use]
    pub fn disposals(&self) -> &DisposalCalculator<R> {
        &self.disposals
    }

    /// Journal entry generator.
    #[must_use]
    pub fn journal(&self) -> &JournalGenerator<R> {
        &self.journal
    }

    /// Reporting view.
    #[must_use]
    pub fn reports(&self) -> &ReportingView<R> {
        &self.reports
    }

    /// Shorthand for [`JournalGenerator::generate`].
    pub async fn generate(&self, event: MovementEvent) -> Result<GenerationOutcome, JournalError> {
        self.journal.generate(event).await
    }
}
