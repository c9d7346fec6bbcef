//! Shared fixtures for store integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use costbook_core::CostbookEngine;
use costbook_core::fiscal::FiscalYear;
use costbook_core::journal::{
    AssetLeg, Fee, GenerationOutcome, JournalError, MovementEvent, MovementKind,
};
use costbook_core::lot::{AcquisitionLot, RebuildSummary};
use costbook_core::reports::Position;
use costbook_shared::LedgerSettings;
use costbook_shared::types::{AssetSymbol, SourceEventId, TenantId};
use costbook_store::InMemoryLedgerRepository;
use rust_decimal::Decimal;

/// A tenant with open fiscal years 2024 and 2025.
pub struct Harness {
    pub tenant: TenantId,
    pub repo: Arc<InMemoryLedgerRepository>,
    pub engine: CostbookEngine<InMemoryLedgerRepository>,
}

impl Harness {
    /// Generates the entry for an event of the harness tenant.
    pub async fn generate(
        &self,
        source: &str,
        at: DateTime<Utc>,
        kind: MovementKind,
    ) -> Result<GenerationOutcome, JournalError> {
        self.engine
            .generate(event(self.tenant, source, at, kind))
            .await
    }

    pub async fn open_lots(&self, asset: &str, include_exhausted: bool) -> Vec<AcquisitionLot> {
        self.engine
            .lots()
            .list_open_lots(self.tenant, &symbol(asset), include_exhausted)
            .await
            .unwrap()
    }

    pub async fn rebuild(&self, asset: &str) -> RebuildSummary {
        self.engine
            .lots()
            .purge_and_rebuild(self.tenant, symbol(asset))
            .await
            .unwrap()
    }

    pub async fn position(&self, asset: &str) -> Position {
        self.engine
            .lots()
            .position(self.tenant, &symbol(asset))
            .await
            .unwrap()
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("costbook_core=debug,costbook_store=debug")
        .with_test_writer()
        .try_init();
}

pub async fn harness() -> Harness {
    harness_with(LedgerSettings::default()).await
}

pub async fn harness_with(settings: LedgerSettings) -> Harness {
    init_tracing();

    let tenant = TenantId::new();
    let repo = Arc::new(InMemoryLedgerRepository::new());
    for year in [2024, 2025] {
        repo.add_fiscal_year(FiscalYear::open(
            tenant,
            format!("FY {year}"),
            date(year, 1, 1),
            date(year, 12, 31),
        ))
        .await;
    }
    let engine = CostbookEngine::new(Arc::clone(&repo), settings);

    Harness {
        tenant,
        repo,
        engine,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap()
}

pub fn symbol(asset: &str) -> AssetSymbol {
    AssetSymbol::new(asset)
}

pub fn event(
    tenant: TenantId,
    source: &str,
    at: DateTime<Utc>,
    kind: MovementKind,
) -> MovementEvent {
    MovementEvent {
        tenant_id: tenant,
        source_event_id: SourceEventId::new(source),
        occurred_at: at,
        kind,
        fee: None,
    }
}

pub fn with_fee(mut event: MovementEvent, value: Decimal) -> MovementEvent {
    event.fee = Some(Fee {
        asset: AssetSymbol::new("EUR"),
        quantity: value,
        value,
    });
    event
}

pub fn buy(asset: &str, quantity: Decimal, value: Decimal) -> MovementKind {
    MovementKind::Acquisition {
        leg: AssetLeg::new(asset, quantity, value),
    }
}

pub fn sell(asset: &str, quantity: Decimal, value: Decimal) -> MovementKind {
    MovementKind::Disposal {
        leg: AssetLeg::new(asset, quantity, value),
    }
}

pub fn swap(
    outgoing: (&str, Decimal, Decimal),
    incoming: (&str, Decimal, Decimal),
) -> MovementKind {
    MovementKind::Swap {
        outgoing: AssetLeg::new(outgoing.0, outgoing.1, outgoing.2),
        incoming: AssetLeg::new(incoming.0, incoming.1, incoming.2),
    }
}

pub fn reward(asset: &str, quantity: Decimal, value: Decimal) -> MovementKind {
    MovementKind::Reward {
        leg: AssetLeg::new(asset, quantity, value),
    }
}

pub fn stake(asset: &str, quantity: Decimal) -> MovementKind {
    MovementKind::Stake {
        leg: AssetLeg::new(asset, quantity, Decimal::ZERO),
    }
}
