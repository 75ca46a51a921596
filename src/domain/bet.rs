//! A single user's prediction on a match.

use chrono::{DateTime, Utc};

use super::id::{BetId, MatchId, UserId};
use super::money::Money;
use super::outcome::BetResult;
use super::prediction::Prediction;
use super::score::Score;

/// A user's bet on a match.
///
/// Bets are owned by their [`Match`](super::Match) and only change through
/// its `place_bet`/`remove_bet` operations. The stake is fixed when the bet is
/// first placed; later stake changes on the table do not reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bet {
    id: BetId,
    user_id: UserId,
    match_id: MatchId,
    prediction: Prediction,
    stake: Money,
    edited_at: DateTime<Utc>,
}

impl Bet {
    pub(super) fn new(
        user_id: UserId,
        match_id: MatchId,
        prediction: Prediction,
        stake: Money,
        edited_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: BetId::new(),
            user_id,
            match_id,
            prediction,
            stake,
            edited_at,
        }
    }

    /// Overwrite the prediction, keeping the bet's identity.
    pub(super) fn repredict(&mut self, prediction: Prediction, edited_at: DateTime<Utc>) {
        self.prediction = prediction;
        self.edited_at = edited_at;
    }

    #[must_use]
    pub const fn id(&self) -> &BetId {
        &self.id
    }

    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub const fn match_id(&self) -> &MatchId {
        &self.match_id
    }

    #[must_use]
    pub const fn prediction(&self) -> &Prediction {
        &self.prediction
    }

    /// Amount committed to the pool by this bet.
    #[must_use]
    pub const fn stake(&self) -> Money {
        self.stake
    }

    /// When the prediction was last placed or changed.
    #[must_use]
    pub const fn edited_at(&self) -> DateTime<Utc> {
        self.edited_at
    }

    /// Score this bet against a recorded result.
    #[must_use]
    pub fn evaluate(&self, result: Option<&Score>) -> BetResult {
        self.prediction.evaluate(result)
    }
}
