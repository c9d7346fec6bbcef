//! Storage layer for the Costbook engine.
//!
//! This crate provides:
//! - An in-memory [`LedgerRepository`](costbook_core::LedgerRepository)
//! - Atomic change-set commits with arrival sequencing
//! - Per-tenant isolation of accounts, lots, entries and the event log

pub mod memory;
mod state;

#[cfg(test)]
mod state_props;

pub use memory::InMemoryLedgerRepository;
