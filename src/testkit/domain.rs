//! Builders for domain values used across tests.
//!
//! Times are anchored at [`t0`] so tests read as offsets from one instant.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::domain::{Country, EventTypeId, Match, Money, Table, TableName, UserId};

/// 2026-06-01 12:00:00 UTC.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
}

pub fn user(id: &str) -> UserId {
    UserId::new(id)
}

pub fn event_type(id: &str) -> EventTypeId {
    EventTypeId::new(id)
}

/// Panics on an invalid name; tests pass literals.
pub fn country(name: &str) -> Country {
    Country::try_new(name).expect("valid country")
}

pub fn money(amount: Decimal) -> Money {
    Money::try_new(amount).expect("non-negative amount")
}

/// A table owned by `creator` on `event_type`, password `"secret"` hashed
/// with [`FakePasswordHasher`](super::password::FakePasswordHasher).
pub fn make_table(name: &str, event_type_id: &str, creator: &str, max_players: u32) -> Table {
    Table::create(
        TableName::try_new(name).expect("valid table name"),
        "fake$secret",
        max_players,
        Money::ZERO,
        user(creator),
        event_type(event_type_id),
        false,
        t0(),
    )
    .expect("valid table")
}

/// Japan vs Korea on `event_type_id`, kicking off `hours` after [`t0`].
pub fn make_match(event_type_id: &str, hours: i64) -> Match {
    Match::schedule(
        event_type(event_type_id),
        country("Japan"),
        country("Korea"),
        t0() + Duration::hours(hours),
        t0(),
        Duration::zero(),
    )
    .expect("valid match")
}
