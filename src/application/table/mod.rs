//! Table commands and queries.

pub mod service;

pub use service::TableService;
