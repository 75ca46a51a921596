//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the application's use cases.

mod retry;

pub mod fixture;
pub mod settlement;
pub mod table;

pub use fixture::MatchService;
pub use settlement::{SettlementService, SweepHandle, SweepReport};
pub use table::TableService;
