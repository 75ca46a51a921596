//! Recorded match scores.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::outcome::Outcome;

/// Parse a `home:away` token made of ASCII digits.
///
/// Returns `None` when the token is malformed or a side does not fit in a `u32`.
pub(crate) fn parse_goals(value: &str) -> Option<(u32, u32)> {
    let (home, away) = value.split_once(':')?;
    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(home) || !is_digits(away) {
        return None;
    }
    Some((home.parse().ok()?, away.parse().ok()?))
}

/// Final score of a match in `home:away` form.
///
/// Each side is held as a `u32`, so a side above [`u32::MAX`] goals is
/// rejected even though it is a well-formed digit run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Score {
    raw: String,
    home: u32,
    away: u32,
}

impl Score {
    /// Parse a score.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidScore`] unless `value` is two digit runs
    /// separated by a single colon, each at most [`u32::MAX`].
    pub fn try_new(value: impl Into<String>) -> Result<Self, DomainError> {
        let raw = value.into();
        match parse_goals(&raw) {
            Some((home, away)) => Ok(Self { raw, home, away }),
            None => Err(DomainError::InvalidScore { value: raw }),
        }
    }

    /// The score exactly as recorded.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub const fn home(&self) -> u32 {
        self.home
    }

    #[must_use]
    pub const fn away(&self) -> u32 {
        self.away
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        Outcome::from_goals(self.home, self.away)
    }
}

impl TryFrom<String> for Score {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Score> for String {
    fn from(score: Score) -> Self {
        score.raw
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
