//! Inbound (driving) ports consumed by inbound adapters.
//!
//! One command or query struct per operation. Transport adapters build these
//! and hand them to the application services.

pub mod command;
