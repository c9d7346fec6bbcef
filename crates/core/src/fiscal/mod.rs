//! Fiscal year management.

pub mod period;

pub use period::{FiscalYear, find_open_year};
