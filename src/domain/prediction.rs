//! User predictions for a match.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::outcome::{BetResult, Outcome};
use super::score::{parse_goals, Score};

/// Token for a plain draw call.
pub const DRAW_TOKEN: &str = "X";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Call {
    Draw,
    Exact { home: u32, away: u32 },
}

/// A bettor's call: either an exact `home:away` score or `X` for a draw.
///
/// Like [`Score`], each side of an exact call must fit in a `u32`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Prediction {
    raw: String,
    call: Call,
}

impl Prediction {
    /// Parse a prediction.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidPrediction`] unless `value` is exactly `X`
    /// or two digit runs separated by a colon, each at most [`u32::MAX`].
    pub fn try_new(value: impl Into<String>) -> Result<Self, DomainError> {
        let raw = value.into();
        let call = if raw == DRAW_TOKEN {
            Call::Draw
        } else if let Some((home, away)) = parse_goals(&raw) {
            Call::Exact { home, away }
        } else {
            return Err(DomainError::InvalidPrediction { value: raw });
        };
        Ok(Self { raw, call })
    }

    /// The prediction exactly as submitted.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Predicted goals, or `None` for a plain draw call.
    #[must_use]
    pub const fn goals(&self) -> Option<(u32, u32)> {
        match self.call {
            Call::Draw => None,
            Call::Exact { home, away } => Some((home, away)),
        }
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        match self.call {
            Call::Draw => Outcome::Draw,
            Call::Exact { home, away } => Outcome::from_goals(home, away),
        }
    }

    /// Score this prediction against a recorded result.
    #[must_use]
    pub fn evaluate(&self, result: Option<&Score>) -> BetResult {
        let Some(score) = result else {
            return BetResult::Pending;
        };
        if self.goals() == Some((score.home(), score.away())) {
            BetResult::ExactHit
        } else if self.outcome() == score.outcome() {
            BetResult::WinnerHit
        } else {
            BetResult::Miss
        }
    }
}

impl TryFrom<String> for Prediction {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Prediction> for String {
    fn from(prediction: Prediction) -> Self {
        prediction.raw
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
