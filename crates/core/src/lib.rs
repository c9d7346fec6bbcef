//! Core business logic for Costbook.
//!
//! This crate contains the cost-basis ledger and the journal engine with ZERO
//! database dependencies. Persistence goes through [`LedgerRepository`].
//!
//! # Modules
//!
//! - `lot` - Acquisition lots, the lot ledger and rebuilds
//! - `disposal` - FIFO allocation and the disposal calculator
//! - `journal` - Movement events, recipes and the entry generator
//! - `guard` - Balance verification and idempotency lookups
//! - `reports` - Positions and the realized-gains report
//! - `account` - Account roles and their resolution
//! - `fiscal` - Fiscal years and open-period lookup

pub mod account;
pub mod asset;
pub mod disposal;
pub mod engine;
pub mod failure;
pub mod fiscal;
pub mod guard;
pub mod journal;
pub mod locks;
pub mod lot;
pub mod replay;
pub mod reports;
pub mod repository;

pub use engine::CostbookEngine;
pub use failure::FailureKind;
pub use repository::{LedgerRepository, RepositoryError};
