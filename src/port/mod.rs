//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! # Architecture
//!
//! ```text
//!    ┌──────────────┐        ┌─────────────────────────┐
//!    │  transport   │──cmd──▶│      Application        │
//!    │  (external)  │◀─res───│  Domain + Port          │
//!    └──────────────┘        └─────────────────────────┘
//!                                 │        │        │
//!                                 ▼        ▼        ▼
//!                            ┌───────┐ ┌───────┐ ┌────────┐
//!                            │ Store │ │ Clock │ │ Hasher │
//!                            └───────┘ └───────┘ └────────┘
//! ```

pub mod inbound;
pub mod outbound;

pub use outbound::clock::Clock;
pub use outbound::password::PasswordHasher;
pub use outbound::store::{
    Change, MatchStore, PoolStore, StatsStore, Store, TableStore, UnitOfWork, Version, Versioned,
};
