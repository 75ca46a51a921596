//! Country names used as match participants.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Maximum length of a country name, in characters.
pub const MAX_COUNTRY_LEN: usize = 100;

/// A non-empty country name of at most [`MAX_COUNTRY_LEN`] characters.
///
/// The value is stored exactly as given; invalid input is rejected rather
/// than normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Country(String);

impl Country {
    /// Create a validated country.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyCountry`] for blank input and
    /// [`DomainError::CountryTooLong`] above [`MAX_COUNTRY_LEN`] characters.
    pub fn try_new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::EmptyCountry);
        }
        let len = value.chars().count();
        if len > MAX_COUNTRY_LEN {
            return Err(DomainError::CountryTooLong {
                len,
                max: MAX_COUNTRY_LEN,
            });
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Country {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Country> for String {
    fn from(country: Country) -> Self {
        country.0
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
