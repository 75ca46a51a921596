//! Tipster - Private prediction tables with pooled stakes.
//!
//! Members of a password-protected table predict scores of scheduled
//! matches. Once a result is recorded, each match's pool is paid out to the
//! best-scoring tier of bettors or rolled over when nobody qualifies.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - **`domain`** - Value objects, the `Match` and `Table` aggregates, pools,
//!   and the pure settlement engine. No I/O and no clock reads.
//! - **`port`** - Commands accepted by the services and the traits they
//!   depend on: `Store`, `Clock`, `PasswordHasher`.
//! - **`application`** - `MatchService`, `TableService`, and
//!   `SettlementService`.
//! - **`adapter`** - `MemoryStore` and `SystemClock`.
//! - **`infrastructure`** - TOML configuration, logging, and service wiring.
//!
//! # Scoring
//!
//! - Exact score: 3 points
//! - Correct winner or draw: 1 point
//! - Anything else: 0 points
//!
//! If any bet hits the exact score, those bettors split the pool. Otherwise
//! the correct-outcome bettors split it. Leftover cents go to the first winner
//! by user id, so payouts always sum to the pool.
//!
//! # Features
//!
//! - `testkit` - Expose [`testkit`] for integration tests
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use tipster::adapter::outbound::clock::SystemClock;
//! use tipster::adapter::outbound::memory::MemoryStore;
//! use tipster::infrastructure::bootstrap::Services;
//! use tipster::infrastructure::config::settings::Config;
//! # use tipster::port::PasswordHasher;
//! # struct Plain;
//! # impl PasswordHasher for Plain {
//! #     fn hash(&self, p: &str) -> String { p.to_string() }
//! #     fn verify(&self, h: &str, p: &str) -> bool { h == p }
//! # }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load("tipster.toml")?;
//! config.init_logging();
//! let services = Services::build(
//!     config,
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(SystemClock),
//!     Arc::new(Plain),
//! )?;
//! # let _ = services;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
