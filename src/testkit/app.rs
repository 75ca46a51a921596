//! All services wired to an in-memory store, a fixed clock, and the fake
//! password hasher.

use std::sync::Arc;

use crate::adapter::outbound::memory::MemoryStore;
use crate::infrastructure::bootstrap::Services;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::clock::Clock;

use super::clock::FixedClock;
use super::domain::t0;
use super::password::FakePasswordHasher;

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
    pub services: Services<MemoryStore>,
}

impl TestApp {
    /// Clock at [`t0`], configuration from [`super::config::config`].
    pub fn new() -> Self {
        Self::with_config(super::config::config())
    }

    pub fn with_config(config: Config) -> Self {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(t0()));
        let shared_clock: Arc<dyn Clock> = Arc::clone(&clock) as Arc<dyn Clock>;
        let services = Services::build(
            config,
            Arc::clone(&store),
            shared_clock,
            Arc::new(FakePasswordHasher),
        )
        .expect("valid test configuration");
        Self {
            store,
            clock,
            services,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
