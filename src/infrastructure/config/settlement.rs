//! Settlement sweep configuration.

use std::time::Duration;

use serde::Deserialize;

/// Settlement sweep configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SettlementConfig {
    /// Matches settled in parallel during one sweep.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Seconds between sweeps when running in the background.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

const fn default_concurrency() -> usize {
    4
}

const fn default_sweep_interval_secs() -> u64 {
    60
}

impl SettlementConfig {
    #[must_use]
    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}
