//! Tax and portfolio reporting.
//!
//! This module provides read-only views over lots and disposal records:
//! - Positions (current and valued at supplied prices)
//! - Realized-gains report split into short- and long-term buckets

pub mod error;
pub mod service;
pub mod types;
pub mod view;

#[cfg(test)]
mod tests;

pub use error::ReportError;
pub use service::ReportService;
pub use types::*;
pub use view::ReportingView;
