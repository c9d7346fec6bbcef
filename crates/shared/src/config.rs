//! Application configuration management.

use serde::{Deserialize, Serialize};

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Ledger engine settings.
    #[serde(default)]
    pub ledger: LedgerSettings,
}

/// What the FIFO engine does when a disposal exceeds the open lot quantity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortfallPolicy {
    /// Consume what is available, report the shortfall, log a warning.
    #[default]
    Lenient,
    /// Refuse the disposal before any lot is touched.
    Reject,
}

/// Ledger engine settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerSettings {
    /// Currency all fiat values and journal amounts are expressed in.
    /// Amounts are rounded to its minor units.
    #[serde(default)]
    pub reporting_currency: Currency,
    /// Precision given to assets registered implicitly on first use.
    #[serde(default = "default_asset_precision")]
    pub default_asset_precision: u32,
    /// Holding period (days) from which a disposal slice counts as long-term.
    #[serde(default = "default_long_term_days")]
    pub long_term_days: i64,
    /// Behaviour when a disposal is not fully covered by lots.
    #[serde(default)]
    pub shortfall_policy: ShortfallPolicy,
}

fn default_asset_precision() -> u32 {
    18
}

fn default_long_term_days() -> i64 {
    365
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            reporting_currency: Currency::default(),
            default_asset_precision: default_asset_precision(),
            long_term_days: default_long_term_days(),
            shortfall_policy: ShortfallPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("COSTBOOK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
