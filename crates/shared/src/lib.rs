//! Shared types, errors, and configuration for Costbook.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Asset symbols and source-event identifiers
//! - Reporting-currency money type with decimal precision
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, LedgerSettings, ShortfallPolicy};
pub use error::{AppError, AppResult};
