//! Asset symbols and source-event identifiers.

use serde::{Deserialize, Serialize};

/// Ticker symbol of a fungible digital asset (e.g. "BTC").
///
/// Symbols are normalized to trimmed upper case so "btc" and "BTC " name the
/// same asset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct AssetSymbol(String);

impl AssetSymbol {
    /// Creates a normalized asset symbol.
    #[must_use]
    pub fn new(symbol: impl AsRef<str>) -> Self {
        Self(symbol.as_ref().trim().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AssetSymbol {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for AssetSymbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<AssetSymbol> for String {
    fn from(value: AssetSymbol) -> Self {
        value.0
    }
}

impl std::fmt::Display for AssetSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable identifier of the upstream event a journal entry is generated from.
///
/// This is the idempotency key: one source event maps to at most one entry
/// per tenant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceEventId(String);

impl SourceEventId {
    /// Wraps an upstream identifier (transaction hash, exchange trade id, ...).
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SourceEventId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for SourceEventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
