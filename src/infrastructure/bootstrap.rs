//! Composition root: wire configuration and adapters into the services.

use std::sync::Arc;

use tracing::info;

use crate::application::{MatchService, SettlementService, SweepHandle, TableService};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::clock::Clock;
use crate::port::outbound::password::PasswordHasher;
use crate::port::outbound::store::Store;

/// Every application service sharing one store and clock.
pub struct Services<S> {
    pub matches: MatchService<S>,
    pub tables: TableService<S>,
    pub settlement: Arc<SettlementService<S>>,
    config: Config,
}

impl<S: Store + 'static> Services<S> {
    /// Build the services from a validated configuration.
    ///
    /// # Errors
    ///
    /// Fails if the pool funding section is invalid.
    #[allow(clippy::result_large_err)]
    pub fn build(
        config: Config,
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Result<Self> {
        let retries = config.store.max_conflict_retries;
        let funding = config.pool_funding()?;

        let matches =
            MatchService::new(Arc::clone(&store), Arc::clone(&clock), config.betting.min_lead())
                .with_conflict_retries(retries);
        let tables = TableService::new(Arc::clone(&store), Arc::clone(&clock), hasher)
            .with_conflict_retries(retries);
        let settlement = SettlementService::new(store, clock, funding)
            .with_concurrency(config.settlement.concurrency)
            .with_conflict_retries(retries);

        info!(
            min_lead_minutes = config.betting.min_lead_time_minutes,
            funding = ?funding,
            concurrency = config.settlement.concurrency,
            max_conflict_retries = retries,
            "Services ready"
        );

        Ok(Self {
            matches,
            tables,
            settlement: Arc::new(settlement),
            config,
        })
    }

    /// Start the background settlement sweep at the configured interval.
    pub fn start_settlement(&self) -> SweepHandle {
        Arc::clone(&self.settlement).start(self.config.settlement.sweep_interval())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
