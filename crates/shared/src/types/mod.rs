//! Common types used across the application.

pub mod asset;
pub mod id;
pub mod money;

pub use asset::{AssetSymbol, SourceEventId};
pub use id::*;
pub use money::{Currency, round_money};
