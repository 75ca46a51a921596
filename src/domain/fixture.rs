//! The Match aggregate: betting windows, bets, and result recording.
//!
//! # Lifecycle
//!
//! ```text
//! scheduled --(clock passes kickoff)--> started --(set_result)--> finished
//! ```
//!
//! `started` is derived from the clock and never stored. Bets may be placed,
//! changed or withdrawn only before kickoff; a result may be recorded only
//! after kickoff and only once.
//!
//! Every operation that depends on time takes `now` explicitly so callers
//! decide which clock drives the state machine.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::bet::Bet;
use super::country::Country;
use super::error::DomainError;
use super::id::{EventTypeId, MatchId, UserId};
use super::money::Money;
use super::outcome::BetResult;
use super::prediction::Prediction;
use super::score::Score;

/// Stored lifecycle status of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Scheduled,
    Finished,
}

/// A scheduled fixture between two countries and the bets placed on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    id: MatchId,
    event_type_id: EventTypeId,
    country1: Country,
    country2: Country,
    scheduled_at: DateTime<Utc>,
    result: Option<Score>,
    status: MatchStatus,
    created_at: DateTime<Utc>,
    bets: BTreeMap<UserId, Bet>,
}

/// Check kickoff is far enough ahead of `now`.
fn ensure_lead_time(
    scheduled_at: DateTime<Utc>,
    now: DateTime<Utc>,
    min_lead: Duration,
) -> Result<(), DomainError> {
    if scheduled_at <= now || scheduled_at - now < min_lead {
        return Err(DomainError::MatchTooSoon {
            scheduled_at,
            lead_minutes: min_lead.num_minutes(),
        });
    }
    Ok(())
}

impl Match {
    /// Schedule a new match.
    ///
    /// # Errors
    ///
    /// - [`DomainError::SameCountries`] if both sides are the same country
    /// - [`DomainError::MatchTooSoon`] unless `scheduled_at` is strictly after
    ///   `now` and at least `min_lead` ahead of it
    pub fn schedule(
        event_type_id: EventTypeId,
        country1: Country,
        country2: Country,
        scheduled_at: DateTime<Utc>,
        now: DateTime<Utc>,
        min_lead: Duration,
    ) -> Result<Self, DomainError> {
        if country1 == country2 {
            return Err(DomainError::SameCountries);
        }
        ensure_lead_time(scheduled_at, now, min_lead)?;

        Ok(Self {
            id: MatchId::new(),
            event_type_id,
            country1,
            country2,
            scheduled_at,
            result: None,
            status: MatchStatus::Scheduled,
            created_at: now,
            bets: BTreeMap::new(),
        })
    }

    #[must_use]
    pub const fn id(&self) -> &MatchId {
        &self.id
    }

    #[must_use]
    pub const fn event_type_id(&self) -> &EventTypeId {
        &self.event_type_id
    }

    #[must_use]
    pub const fn country1(&self) -> &Country {
        &self.country1
    }

    #[must_use]
    pub const fn country2(&self) -> &Country {
        &self.country2
    }

    /// Kickoff time.
    #[must_use]
    pub const fn scheduled_at(&self) -> DateTime<Utc> {
        self.scheduled_at
    }

    #[must_use]
    pub const fn result(&self) -> Option<&Score> {
        self.result.as_ref()
    }

    #[must_use]
    pub const fn status(&self) -> MatchStatus {
        self.status
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// True once `now` has reached kickoff.
    #[must_use]
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        now >= self.scheduled_at
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    /// All bets, ordered by user id.
    pub fn bets(&self) -> impl Iterator<Item = &Bet> {
        self.bets.values()
    }

    #[must_use]
    pub fn bet_count(&self) -> usize {
        self.bets.len()
    }

    #[must_use]
    pub fn bet_for(&self, user_id: &UserId) -> Option<&Bet> {
        self.bets.get(user_id)
    }

    /// Bets a viewer may see.
    ///
    /// On a secret table other users' predictions stay hidden until kickoff.
    pub fn visible_bets<'a>(
        &'a self,
        viewer: &'a UserId,
        secret_mode: bool,
        now: DateTime<Utc>,
    ) -> impl Iterator<Item = &'a Bet> + 'a {
        let reveal_all = !secret_mode || self.has_started(now);
        self.bets
            .values()
            .filter(move |bet| reveal_all || bet.user_id() == viewer)
    }

    /// Score every bet against the recorded result.
    pub fn scored_bets(&self) -> impl Iterator<Item = (&Bet, BetResult)> {
        let result = self.result.as_ref();
        self.bets.values().map(move |bet| (bet, bet.evaluate(result)))
    }

    fn ensure_not_started(&self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.has_started(now) {
            return Err(DomainError::MatchAlreadyStarted);
        }
        Ok(())
    }

    /// Place or overwrite the user's bet.
    ///
    /// `stake` is recorded only when a new bet is created; overwriting a
    /// prediction keeps the stake first committed. Returns `true` when this
    /// created a new bet rather than changing one.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MatchAlreadyStarted`] at or after kickoff.
    pub fn place_bet(
        &mut self,
        user_id: UserId,
        prediction: Prediction,
        stake: Money,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        self.ensure_not_started(now)?;

        if let Some(bet) = self.bets.get_mut(&user_id) {
            bet.repredict(prediction, now);
            return Ok(false);
        }

        let bet = Bet::new(user_id.clone(), self.id.clone(), prediction, stake, now);
        self.bets.insert(user_id, bet);
        Ok(true)
    }

    /// Withdraw the user's bet.
    ///
    /// # Errors
    ///
    /// - [`DomainError::MatchAlreadyStarted`] at or after kickoff
    /// - [`DomainError::BetNotFound`] if the user has no bet
    pub fn remove_bet(&mut self, user_id: &UserId, now: DateTime<Utc>) -> Result<Bet, DomainError> {
        self.ensure_not_started(now)?;
        self.bets
            .remove(user_id)
            .ok_or_else(|| DomainError::BetNotFound {
                user_id: user_id.to_string(),
            })
    }

    /// Record the final score. Irreversible through this aggregate.
    ///
    /// # Errors
    ///
    /// - [`DomainError::MatchNotStarted`] before kickoff
    /// - [`DomainError::ResultAlreadySet`] if a score already exists
    pub fn set_result(&mut self, score: Score, now: DateTime<Utc>) -> Result<(), DomainError> {
        if !self.has_started(now) {
            return Err(DomainError::MatchNotStarted);
        }
        if self.result.is_some() {
            return Err(DomainError::ResultAlreadySet);
        }
        self.result = Some(score);
        self.status = MatchStatus::Finished;
        Ok(())
    }

    /// Change the countries or kickoff time.
    ///
    /// # Errors
    ///
    /// - [`DomainError::MatchAlreadyStarted`] at or after the current kickoff
    /// - the same validation as [`Match::schedule`] for the new values
    pub fn update(
        &mut self,
        country1: Country,
        country2: Country,
        scheduled_at: DateTime<Utc>,
        now: DateTime<Utc>,
        min_lead: Duration,
    ) -> Result<(), DomainError> {
        self.ensure_not_started(now)?;
        if country1 == country2 {
            return Err(DomainError::SameCountries);
        }
        ensure_lead_time(scheduled_at, now, min_lead)?;

        self.country1 = country1;
        self.country2 = country2;
        self.scheduled_at = scheduled_at;
        Ok(())
    }

    /// Check the match may be deleted.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MatchHasDependents`] once any bet exists or a
    /// result is set.
    pub fn ensure_deletable(&self) -> Result<(), DomainError> {
        if !self.bets.is_empty() || self.result.is_some() {
            return Err(DomainError::MatchHasDependents);
        }
        Ok(())
    }
}
