//! Application configuration management.

use serde::Deserialize;

use crate::types::Money;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Ledger bootstrap configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Out-of-band data the ledger is seeded with at startup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LedgerConfig {
    /// Chart of accounts.
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
    /// Period keys (`YYYY-MM`) opened at startup, in order.
    #[serde(default)]
    pub open_periods: Vec<String>,
    /// Recurring entry templates registered at startup.
    #[serde(default)]
    pub recurring: Vec<RecurringTemplateConfig>,
}

/// A chart-of-accounts row.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
    /// Stable account code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// `debit` or `credit`.
    pub normal_side: String,
}

/// A recurring template definition.
#[derive(Debug, Clone, Deserialize)]
pub struct RecurringTemplateConfig {
    /// Template name, e.g. "Monthly Depreciation".
    pub name: String,
    /// `monthly`, `quarterly`, `annually:<month>` or `every:<n>:<YYYY-MM>`.
    pub rule: String,
    /// Post instances directly instead of routing them to approval.
    #[serde(default)]
    pub autopost: bool,
    /// Template lines.
    pub lines: Vec<TemplateLineConfig>,
}

/// One line of a recurring template.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateLineConfig {
    /// Account code.
    pub account_code: String,
    /// Debit amount as a decimal string.
    pub debit: Option<Money>,
    /// Credit amount as a decimal string.
    pub credit: Option<Money>,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("JOURNAL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
