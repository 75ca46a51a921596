use thiserror::Error;

use crate::domain::error::{DomainError, ErrorKind};

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Persistence errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Another unit of work changed the row since it was loaded.
    #[error("write conflict on {entity} {id}: expected version {expected:?}, found {actual:?}")]
    Conflict {
        entity: &'static str,
        id: String,
        expected: Option<u64>,
        actual: Option<u64>,
    },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A programming error, such as settling a match without a result.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl Error {
    /// Business category, or `None` for fatal errors.
    ///
    /// Write conflicts map to [`ErrorKind::Conflict`]; an unavailable store,
    /// bad configuration, and invariant violations are fatal.
    #[must_use]
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Domain(e) => Some(e.kind()),
            Self::Store(StoreError::Conflict { .. }) => Some(ErrorKind::Conflict),
            Self::Store(StoreError::Unavailable(_))
            | Self::Config(_)
            | Self::InvariantViolation(_) => None,
        }
    }

    /// Stable code for business errors.
    #[must_use]
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Domain(e) => Some(e.code()),
            Self::Store(StoreError::Conflict { .. }) => Some("Store.Conflict"),
            _ => None,
        }
    }

    /// True only for lost optimistic-concurrency races.
    #[must_use]
    pub fn is_write_conflict(&self) -> bool {
        matches!(self, Self::Store(StoreError::Conflict { .. }))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
