//! Time source port.

use chrono::{DateTime, Utc};

/// Source of "now" for every time comparison in the application layer.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
