//! Domain identifier types with proper encapsulation.
//!
//! Aggregates reference each other by these ids only; no aggregate holds a
//! pointer to another.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Newtype over an externally assigned string id.
macro_rules! external_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Create a new `", stringify!($name), "` from a string.")]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[doc = concat!("Get the ", stringify!($name), " as a string slice.")]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

/// Newtype over a UUID v4 generated when the entity is created.
macro_rules! generated_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Create a new `", stringify!($name), "` with a generated UUID.")]
            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            #[doc = concat!("Get the ", stringify!($name), " as a string slice.")]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

external_id!(
    /// Identifier of an authenticated user, issued by the identity provider.
    ///
    /// Ordering is lexicographic on the string form, which settlement relies on
    /// to pick the winner that absorbs the remainder cents.
    UserId
);

external_id!(
    /// Identifier of the event type (tournament, league) a table bets on.
    EventTypeId
);

generated_id!(
    /// Identifier of a [`Match`](super::Match).
    MatchId
);

generated_id!(
    /// Identifier of a [`Bet`](super::Bet).
    BetId
);

generated_id!(
    /// Identifier of a [`Table`](super::Table).
    TableId
);

generated_id!(
    /// Identifier of a [`Pool`](super::Pool).
    PoolId
);
