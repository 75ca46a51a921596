//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the collaborators the application layer is handed:
//! persistence, time, and password hashing.

pub mod clock;
pub mod password;
pub mod store;
