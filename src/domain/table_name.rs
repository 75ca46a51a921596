//! Table display names.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Maximum length of a table name, in characters.
pub const MAX_TABLE_NAME_LEN: usize = 100;

/// A non-empty table name of at most [`MAX_TABLE_NAME_LEN`] characters.
///
/// Uniqueness across tables is enforced by the store, not by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableName(String);

impl TableName {
    /// Create a validated table name.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyTableName`] or [`DomainError::TableNameTooLong`].
    pub fn try_new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::EmptyTableName);
        }
        let len = value.chars().count();
        if len > MAX_TABLE_NAME_LEN {
            return Err(DomainError::TableNameTooLong {
                len,
                max: MAX_TABLE_NAME_LEN,
            });
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TableName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<TableName> for String {
    fn from(name: TableName) -> Self {
        name.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
