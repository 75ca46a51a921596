//! Persistence configuration.

use serde::Deserialize;

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Extra attempts, each with a fresh reload, after a write conflict.
    #[serde(default = "default_max_conflict_retries")]
    pub max_conflict_retries: u32,
}

const fn default_max_conflict_retries() -> u32 {
    1
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_conflict_retries: default_max_conflict_retries(),
        }
    }
}
