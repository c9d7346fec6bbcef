//! FIFO disposal engine.
//!
//! This module provides:
//! - Pure FIFO allocation over a set of lots
//! - The disposal calculator, which applies an allocation under the asset lock
//! - Disposal records persisted for reporting and rebuild

pub mod error;
pub mod fifo;
pub mod service;
pub mod types;

#[cfg(test)]
mod fifo_props;

pub use error::DisposalError;
pub use fifo::{allocate, holding_period_days};
pub use service::DisposalCalculator;
pub use types::{Consumption, DisposalRecord, DisposalRequest, DisposalResult};
