//! Outcome classes and bet scoring tiers.

use serde::{Deserialize, Serialize};

/// Which side a scoreline favours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The first country scored more.
    Home,
    /// The second country scored more.
    Away,
    Draw,
}

impl Outcome {
    /// Classify a `(home, away)` goal pair.
    #[must_use]
    pub fn from_goals(home: u32, away: u32) -> Self {
        match home.cmp(&away) {
            std::cmp::Ordering::Greater => Self::Home,
            std::cmp::Ordering::Less => Self::Away,
            std::cmp::Ordering::Equal => Self::Draw,
        }
    }
}

/// Scoring tier of a bet against a match result.
///
/// Point values are fixed: 3 for an exact hit, 1 for the right outcome class,
/// 0 otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetResult {
    /// No result recorded yet.
    Pending,
    /// Predicted score equals the recorded score.
    ExactHit,
    /// Predicted outcome class is right but the score is not.
    WinnerHit,
    /// Predicted outcome class is wrong.
    Miss,
}

impl BetResult {
    /// Points awarded for this tier.
    #[must_use]
    pub const fn points(self) -> u32 {
        match self {
            Self::ExactHit => 3,
            Self::WinnerHit => 1,
            Self::Pending | Self::Miss => 0,
        }
    }

    /// True for tiers that count as a correct call.
    #[must_use]
    pub const fn is_hit(self) -> bool {
        matches!(self, Self::ExactHit | Self::WinnerHit)
    }
}
