//! Betting window configuration.

use chrono::Duration;
use serde::Deserialize;

/// Rules for when matches may be scheduled.
#[derive(Debug, Clone, Deserialize)]
pub struct BettingConfig {
    /// Minimum minutes between scheduling a match and its kickoff.
    #[serde(default = "default_min_lead_time_minutes")]
    pub min_lead_time_minutes: u32,
}

const fn default_min_lead_time_minutes() -> u32 {
    5
}

impl BettingConfig {
    #[must_use]
    pub fn min_lead(&self) -> Duration {
        Duration::minutes(i64::from(self.min_lead_time_minutes))
    }
}

impl Default for BettingConfig {
    fn default() -> Self {
        Self {
            min_lead_time_minutes: default_min_lead_time_minutes(),
        }
    }
}
