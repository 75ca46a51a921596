//! Canonical test configuration.

use crate::infrastructure::config::settings::Config;

/// Defaults with a one-second sweep interval and no minimum lead time.
pub fn config() -> Config {
    let mut config = Config::default();
    config.betting.min_lead_time_minutes = 0;
    config.settlement.sweep_interval_secs = 1;
    config
}
