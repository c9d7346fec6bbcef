//! Acquisition lots.
//!
//! A lot is a quantity of one asset acquired at one time for one total
//! cost. Lots are consumed oldest-first by disposals and can be rebuilt
//! from the recorded event history at any time.

pub mod book;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod book_props;

pub use book::LotBook;
pub use error::LotError;
pub use service::{LotLedger, RebuildSummary};
pub use types::{AcquisitionLot, LotReduction};
