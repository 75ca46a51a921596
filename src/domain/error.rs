//! Domain errors for value objects and aggregates.
//!
//! Every business rule that can reject a request has its own variant. Callers
//! branch on [`DomainError::kind`] to pick a transport representation and may
//! log or return [`DomainError::code`] as a stable identifier.
//!
//! # Examples
//!
//! ```
//! use tipster::domain::{Country, DomainError, ErrorKind};
//!
//! let err = Country::try_new("").unwrap_err();
//! assert!(matches!(err, DomainError::EmptyCountry));
//! assert_eq!(err.kind(), ErrorKind::Validation);
//! assert_eq!(err.code(), "Country.Empty");
//! ```

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

/// Category of an expected business failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input or a violated precondition the caller can fix.
    Validation,
    /// The referenced aggregate, member, or bet does not exist.
    NotFound,
    /// The caller is not authorized for this action on this aggregate.
    Forbidden,
    /// The state already satisfies the request, or a concurrent write won.
    Conflict,
}

impl ErrorKind {
    /// Stable lowercase name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::Conflict => "conflict",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned when a value object or aggregate rejects an operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("country must not be empty")]
    EmptyCountry,

    #[error("country must be at most {max} characters, got {len}")]
    CountryTooLong { len: usize, max: usize },

    #[error("prediction '{value}' must be 'home:away' or 'X'")]
    InvalidPrediction { value: String },

    #[error("score '{value}' must be 'home:away'")]
    InvalidScore { value: String },

    #[error("money amount must not be negative, got {amount}")]
    NegativeMoney { amount: Decimal },

    #[error("money subtraction {lhs} - {rhs} would be negative")]
    MoneyUnderflow { lhs: Decimal, rhs: Decimal },

    #[error("money addition {lhs} + {rhs} overflows")]
    MoneyOverflow { lhs: Decimal, rhs: Decimal },

    #[error("cannot divide money by zero")]
    DivideByZero,

    #[error("table name must not be empty")]
    EmptyTableName,

    #[error("table name must be at most {max} characters, got {len}")]
    TableNameTooLong { len: usize, max: usize },

    #[error("match time {scheduled_at} must be at least {lead_minutes} minutes in the future")]
    MatchTooSoon {
        scheduled_at: chrono::DateTime<chrono::Utc>,
        lead_minutes: i64,
    },

    #[error("a match cannot be played between a country and itself")]
    SameCountries,

    #[error("match has already started")]
    MatchAlreadyStarted,

    #[error("match has not started yet")]
    MatchNotStarted,

    #[error("match result is already set")]
    ResultAlreadySet,

    #[error("match has bets or a result and cannot be deleted")]
    MatchHasDependents,

    #[error("match {match_id} not found")]
    MatchNotFound { match_id: String },

    #[error("user {user_id} has no bet on this match")]
    BetNotFound { user_id: String },

    #[error("stake {stake} exceeds the maximum of {max}")]
    StakeTooLarge { stake: Decimal, max: Decimal },

    #[error("max players must be at least 1, got {max_players}")]
    InvalidMaxPlayers { max_players: u32 },

    #[error("max players {max_players} is below the current member count {members}")]
    MaxPlayersBelowMembers { max_players: u32, members: usize },

    #[error("invalid table password")]
    InvalidPassword,

    #[error("table is full ({max_players} players)")]
    TableFull { max_players: u32 },

    #[error("user {user_id} is already a member")]
    AlreadyMember { user_id: String },

    #[error("user {user_id} is not a member of this table")]
    MemberNotFound { user_id: String },

    #[error("user {user_id} must be a member of this table")]
    NotMember { user_id: String },

    #[error("user {user_id} is not an admin of this table")]
    NotAdmin { user_id: String },

    #[error("user {user_id} is already an admin")]
    AlreadyAdmin { user_id: String },

    #[error("user {user_id} is not an admin, nothing to revoke")]
    TargetNotAdmin { user_id: String },

    #[error("cannot remove the last admin of a table")]
    CannotRemoveLastAdmin,

    #[error("cannot revoke the last admin of a table")]
    CannotRevokeLastAdmin,

    #[error("table {table_id} not found")]
    TableNotFound { table_id: String },

    #[error("no table owns event type {event_type_id}")]
    EventTypeNotFound { event_type_id: String },

    #[error("table name '{name}' is already taken")]
    TableNameTaken { name: String },

    #[error("event type {event_type_id} already belongs to another table")]
    EventTypeTaken { event_type_id: String },

    #[error("pool for match {match_id} is already {status}")]
    PoolNotActive { match_id: String, status: String },
}

impl DomainError {
    /// Category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyCountry
            | Self::CountryTooLong { .. }
            | Self::InvalidPrediction { .. }
            | Self::InvalidScore { .. }
            | Self::NegativeMoney { .. }
            | Self::MoneyUnderflow { .. }
            | Self::MoneyOverflow { .. }
            | Self::DivideByZero
            | Self::EmptyTableName
            | Self::TableNameTooLong { .. }
            | Self::MatchTooSoon { .. }
            | Self::SameCountries
            | Self::MatchAlreadyStarted
            | Self::MatchNotStarted
            | Self::ResultAlreadySet
            | Self::MatchHasDependents
            | Self::StakeTooLarge { .. }
            | Self::InvalidMaxPlayers { .. }
            | Self::MaxPlayersBelowMembers { .. }
            | Self::TableFull { .. }
            | Self::CannotRemoveLastAdmin
            | Self::CannotRevokeLastAdmin => ErrorKind::Validation,

            Self::MatchNotFound { .. }
            | Self::BetNotFound { .. }
            | Self::TableNotFound { .. }
            | Self::MemberNotFound { .. }
            | Self::EventTypeNotFound { .. } => ErrorKind::NotFound,

            Self::InvalidPassword | Self::NotMember { .. } | Self::NotAdmin { .. } => {
                ErrorKind::Forbidden
            }

            Self::AlreadyMember { .. }
            | Self::AlreadyAdmin { .. }
            | Self::TargetNotAdmin { .. }
            | Self::TableNameTaken { .. }
            | Self::EventTypeTaken { .. }
            | Self::PoolNotActive { .. } => ErrorKind::Conflict,
        }
    }

    /// Stable `Aggregate.Reason` identifier.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyCountry => "Country.Empty",
            Self::CountryTooLong { .. } => "Country.TooLong",
            Self::InvalidPrediction { .. } => "Prediction.Invalid",
            Self::InvalidScore { .. } => "Score.Invalid",
            Self::NegativeMoney { .. } => "Money.Negative",
            Self::MoneyUnderflow { .. } => "Money.Underflow",
            Self::MoneyOverflow { .. } => "Money.Overflow",
            Self::DivideByZero => "Money.DivideByZero",
            Self::EmptyTableName => "TableName.Empty",
            Self::TableNameTooLong { .. } => "TableName.TooLong",
            Self::MatchTooSoon { .. } => "Match.TooSoon",
            Self::SameCountries => "Match.SameCountries",
            Self::MatchAlreadyStarted => "Match.AlreadyStarted",
            Self::MatchNotStarted => "Match.NotStarted",
            Self::ResultAlreadySet => "Match.ResultAlreadySet",
            Self::MatchHasDependents => "Match.HasDependents",
            Self::MatchNotFound { .. } => "Match.NotFound",
            Self::BetNotFound { .. } => "Bet.NotFound",
            Self::StakeTooLarge { .. } => "Table.StakeTooLarge",
            Self::InvalidMaxPlayers { .. } => "Table.InvalidMaxPlayers",
            Self::MaxPlayersBelowMembers { .. } => "Table.MaxPlayersBelowMembers",
            Self::InvalidPassword => "Table.InvalidPassword",
            Self::TableFull { .. } => "Table.Full",
            Self::AlreadyMember { .. } => "Table.AlreadyMember",
            Self::MemberNotFound { .. } => "Table.MemberNotFound",
            Self::NotMember { .. } => "Table.NotMember",
            Self::NotAdmin { .. } => "Table.NotAdmin",
            Self::AlreadyAdmin { .. } => "Table.AlreadyAdmin",
            Self::TargetNotAdmin { .. } => "Table.TargetNotAdmin",
            Self::CannotRemoveLastAdmin => "Table.CannotRemoveLastAdmin",
            Self::CannotRevokeLastAdmin => "Table.CannotRevokeLastAdmin",
            Self::TableNotFound { .. } => "Table.NotFound",
            Self::EventTypeNotFound { .. } => "Table.EventTypeNotFound",
            Self::TableNameTaken { .. } => "Table.NameTaken",
            Self::EventTypeTaken { .. } => "Table.EventTypeTaken",
            Self::PoolNotActive { .. } => "Pool.NotActive",
        }
    }
}
