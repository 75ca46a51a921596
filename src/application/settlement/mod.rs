//! Pool settlement for finished matches.
//!
//! - [`service`]: settle one match and run sweeps over every unsettled match
//! - [`sweep`]: periodic background sweeps

pub mod service;
pub mod sweep;

pub use service::{SettlementService, SweepReport};
pub use sweep::SweepHandle;
