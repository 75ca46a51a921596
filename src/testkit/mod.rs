//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`clock`]: [`FixedClock`](clock::FixedClock), a settable time source.
//! - [`password`]: [`FakePasswordHasher`](password::FakePasswordHasher).
//! - [`domain`]: Builders for ids, countries, tables, and matches.
//! - [`config`]: Canonical test configuration.
//! - [`app`]: Every service wired to one in-memory store.

pub mod app;
pub mod clock;
pub mod config;
pub mod domain;
pub mod password;
