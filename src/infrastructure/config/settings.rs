//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Every section is optional; an empty file yields the defaults.
//!
//! # Example
//!
//! ```no_run
//! use tipster::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("tipster.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use super::betting::BettingConfig;
use super::logging::LoggingConfig;
use super::pool::PoolConfig;
use super::settlement::SettlementConfig;
use super::store::StoreConfig;
use crate::domain::PoolFunding;
use crate::error::{ConfigError, Result};

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Scheduling rules for matches.
    #[serde(default)]
    pub betting: BettingConfig,

    /// How match pools are funded.
    #[serde(default)]
    pub pool: PoolConfig,

    /// Background settlement sweep.
    #[serde(default)]
    pub settlement: SettlementConfig,

    /// Optimistic concurrency retries.
    #[serde(default)]
    pub store: StoreConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - Validation fails (e.g., zero settlement concurrency)
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        self.logging.validate()?;
        self.pool.funding()?;

        if self.settlement.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "settlement.concurrency",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.settlement.sweep_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "settlement.sweep_interval_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Resolved pool funding model.
    ///
    /// # Errors
    ///
    /// Only fails for a configuration that skipped validation.
    #[allow(clippy::result_large_err)]
    pub fn pool_funding(&self) -> Result<PoolFunding> {
        Ok(self.pool.funding()?)
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
