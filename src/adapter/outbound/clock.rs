//! Wall-clock time source.

use chrono::{DateTime, Utc};

use crate::port::outbound::clock::Clock;

/// Reads the system clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
