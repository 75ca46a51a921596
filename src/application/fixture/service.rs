//! Match use cases: scheduling, betting, and recording results.
//!
//! Every command loads the match fresh, applies one aggregate operation, and
//! commits through a [`UnitOfWork`]. Lost write races are retried with a
//! reload up to the configured budget.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info};

use crate::application::retry::with_conflict_retry;
use crate::domain::{
    Bet, Country, DomainError, EventTypeId, Match, MatchId, Pool, Prediction, Score, Table, UserId,
};
use crate::error::{Error, Result};
use crate::port::inbound::command::{
    CreateMatch, DeleteMatch, GetMatch, ListTableMatches, MatchBets, PlaceBet, RemoveBet,
    SetResult, UpdateMatch,
};
use crate::port::outbound::clock::Clock;
use crate::port::outbound::store::{Store, UnitOfWork, Versioned};

const DEFAULT_CONFLICT_RETRIES: u32 = 1;

/// Handles every command and query on the Match aggregate.
pub struct MatchService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    min_lead: Duration,
    max_conflict_retries: u32,
}

impl<S: Store> MatchService<S> {
    /// `min_lead` is the shortest allowed gap between now and kickoff when a
    /// match is scheduled or rescheduled.
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, min_lead: Duration) -> Self {
        Self {
            store,
            clock,
            min_lead,
            max_conflict_retries: DEFAULT_CONFLICT_RETRIES,
        }
    }

    #[must_use]
    pub fn with_conflict_retries(mut self, retries: u32) -> Self {
        self.max_conflict_retries = retries;
        self
    }

    /// Schedule a match.
    ///
    /// # Errors
    ///
    /// - `Table.EventTypeNotFound` if no table owns the event type
    /// - `Table.NotAdmin` unless the requester administers that table
    /// - country, same-country, and lead-time validation
    pub async fn create_match(&self, cmd: CreateMatch) -> Result<Match> {
        self.require_admin(&cmd.event_type_id, &cmd.requested_by)
            .await?;

        let country1 = Country::try_new(cmd.country1)?;
        let country2 = Country::try_new(cmd.country2)?;
        let fixture = Match::schedule(
            cmd.event_type_id,
            country1,
            country2,
            cmd.scheduled_at,
            self.clock.now(),
            self.min_lead,
        )?;

        let mut work = UnitOfWork::new();
        work.add_match(fixture.clone());
        self.store.save_changes(work).await?;

        info!(
            match_id = %fixture.id(),
            event_type = %fixture.event_type_id(),
            home = %fixture.country1(),
            away = %fixture.country2(),
            kickoff = %fixture.scheduled_at(),
            "Match scheduled"
        );
        Ok(fixture)
    }

    /// Change countries or kickoff of a match that has not started.
    ///
    /// # Errors
    ///
    /// - `Match.NotFound`, `Table.NotAdmin`
    /// - `Match.AlreadyStarted` and the validation of [`Self::create_match`]
    pub async fn update_match(&self, cmd: UpdateMatch) -> Result<Match> {
        let cmd = &cmd;
        with_conflict_retry("update_match", self.max_conflict_retries, move || {
            self.update_match_once(cmd)
        })
        .await
    }

    async fn update_match_once(&self, cmd: &UpdateMatch) -> Result<Match> {
        let mut loaded = self.load_match(&cmd.match_id).await?;
        self.require_admin(loaded.value.event_type_id(), &cmd.requested_by)
            .await?;

        let country1 = Country::try_new(cmd.country1.as_str())?;
        let country2 = Country::try_new(cmd.country2.as_str())?;
        loaded.value.update(
            country1,
            country2,
            cmd.scheduled_at,
            self.clock.now(),
            self.min_lead,
        )?;

        let updated = loaded.value.clone();
        let mut work = UnitOfWork::new();
        work.update_match(loaded);
        self.store.save_changes(work).await?;

        info!(match_id = %updated.id(), kickoff = %updated.scheduled_at(), "Match updated");
        Ok(updated)
    }

    /// Delete a match that has neither bets nor a result.
    ///
    /// # Errors
    ///
    /// `Match.NotFound`, `Table.NotAdmin`, or `Match.HasDependents`.
    pub async fn delete_match(&self, cmd: DeleteMatch) -> Result<()> {
        let cmd = &cmd;
        with_conflict_retry("delete_match", self.max_conflict_retries, move || {
            self.delete_match_once(cmd)
        })
        .await
    }

    async fn delete_match_once(&self, cmd: &DeleteMatch) -> Result<()> {
        let loaded = self.load_match(&cmd.match_id).await?;
        self.require_admin(loaded.value.event_type_id(), &cmd.requested_by)
            .await?;
        loaded.value.ensure_deletable()?;

        let mut work = UnitOfWork::new();
        work.delete_match(&loaded);
        self.store.save_changes(work).await?;

        info!(match_id = %cmd.match_id, "Match deleted");
        Ok(())
    }

    /// Place or overwrite a bet. Opens the match's pool on the first bet.
    ///
    /// # Errors
    ///
    /// - `Prediction.Invalid` for a malformed prediction
    /// - `Match.NotFound`, `Table.EventTypeNotFound`
    /// - `Table.NotMember` unless the bettor sits at the owning table
    /// - `Match.AlreadyStarted` at or after kickoff
    pub async fn place_bet(&self, cmd: PlaceBet) -> Result<Bet> {
        let prediction = Prediction::try_new(cmd.prediction.as_str())?;
        let (cmd, prediction) = (&cmd, &prediction);
        with_conflict_retry("place_bet", self.max_conflict_retries, move || {
            self.place_bet_once(cmd, prediction)
        })
        .await
    }

    async fn place_bet_once(&self, cmd: &PlaceBet, prediction: &Prediction) -> Result<Bet> {
        let mut loaded = self.load_match(&cmd.match_id).await?;
        let table = self.owning_table(loaded.value.event_type_id()).await?;
        if !table.value.is_user_member(&cmd.user_id) {
            return Err(DomainError::NotMember {
                user_id: cmd.user_id.to_string(),
            }
            .into());
        }

        let now = self.clock.now();
        let created = loaded
            .value
            .place_bet(cmd.user_id.clone(), prediction.clone(), table.value.stake(), now)?;
        let bet = loaded
            .value
            .bet_for(&cmd.user_id)
            .cloned()
            .ok_or_else(|| Error::InvariantViolation(format!("bet of {} vanished", cmd.user_id)))?;

        let mut work = UnitOfWork::new();
        if self.store.pool_for_match(&cmd.match_id).await?.is_none() {
            debug!(match_id = %cmd.match_id, "Opening pool");
            work.add_pool(Pool::open(cmd.match_id.clone(), now));
        }
        work.update_match(loaded);
        // A member leaving between the membership check and this commit
        // changes the table and fails the batch.
        work.check_table(&table);
        self.store.save_changes(work).await?;

        info!(
            match_id = %cmd.match_id,
            user_id = %cmd.user_id,
            prediction = %prediction,
            stake = %bet.stake(),
            created,
            "Bet placed"
        );
        Ok(bet)
    }

    /// Withdraw a bet before kickoff.
    ///
    /// # Errors
    ///
    /// `Match.NotFound`, `Match.AlreadyStarted`, or `Bet.NotFound`.
    pub async fn remove_bet(&self, cmd: RemoveBet) -> Result<Bet> {
        let cmd = &cmd;
        with_conflict_retry("remove_bet", self.max_conflict_retries, move || {
            self.remove_bet_once(cmd)
        })
        .await
    }

    async fn remove_bet_once(&self, cmd: &RemoveBet) -> Result<Bet> {
        let mut loaded = self.load_match(&cmd.match_id).await?;
        let removed = loaded.value.remove_bet(&cmd.user_id, self.clock.now())?;

        let mut work = UnitOfWork::new();
        work.update_match(loaded);
        self.store.save_changes(work).await?;

        info!(match_id = %cmd.match_id, user_id = %cmd.user_id, "Bet removed");
        Ok(removed)
    }

    /// Record the final score.
    ///
    /// # Errors
    ///
    /// - `Score.Invalid` for a malformed score
    /// - `Match.NotFound`, `Table.NotAdmin`
    /// - `Match.NotStarted` before kickoff, `Match.ResultAlreadySet` after
    pub async fn set_result(&self, cmd: SetResult) -> Result<Match> {
        let score = Score::try_new(cmd.score.as_str())?;
        let (cmd, score) = (&cmd, &score);
        with_conflict_retry("set_result", self.max_conflict_retries, move || {
            self.set_result_once(cmd, score)
        })
        .await
    }

    async fn set_result_once(&self, cmd: &SetResult, score: &Score) -> Result<Match> {
        let mut loaded = self.load_match(&cmd.match_id).await?;
        self.require_admin(loaded.value.event_type_id(), &cmd.requested_by)
            .await?;
        loaded.value.set_result(score.clone(), self.clock.now())?;

        let finished = loaded.value.clone();
        let mut work = UnitOfWork::new();
        work.update_match(loaded);
        self.store.save_changes(work).await?;

        info!(match_id = %cmd.match_id, score = %score, "Result recorded");
        Ok(finished)
    }

    /// # Errors
    ///
    /// `Match.NotFound` if no such match exists.
    pub async fn get_match(&self, query: GetMatch) -> Result<Match> {
        Ok(self.load_match(&query.match_id).await?.value)
    }

    /// All matches of an event type ordered by kickoff.
    ///
    /// # Errors
    ///
    /// Only on store failure.
    pub async fn list_table_matches(&self, query: ListTableMatches) -> Result<Vec<Match>> {
        self.store.matches_for_event_type(&query.event_type_id).await
    }

    /// Bets the viewer may see. On a secret table other users' bets stay
    /// hidden until kickoff.
    ///
    /// # Errors
    ///
    /// `Match.NotFound` or `Table.EventTypeNotFound`.
    pub async fn match_bets(&self, query: MatchBets) -> Result<Vec<Bet>> {
        let fixture = self.load_match(&query.match_id).await?.value;
        let table = self.owning_table(fixture.event_type_id()).await?.value;
        Ok(fixture
            .visible_bets(&query.viewer, table.is_secret_mode(), self.clock.now())
            .cloned()
            .collect())
    }

    async fn load_match(&self, id: &MatchId) -> Result<Versioned<Match>> {
        self.store
            .get_match(id)
            .await?
            .ok_or_else(|| {
                DomainError::MatchNotFound {
                    match_id: id.to_string(),
                }
                .into()
            })
    }

    async fn owning_table(&self, event_type_id: &EventTypeId) -> Result<Versioned<Table>> {
        self.store
            .table_for_event_type(event_type_id)
            .await?
            .ok_or_else(|| {
                DomainError::EventTypeNotFound {
                    event_type_id: event_type_id.to_string(),
                }
                .into()
            })
    }

    async fn require_admin(&self, event_type_id: &EventTypeId, user_id: &UserId) -> Result<()> {
        let table = self.owning_table(event_type_id).await?.value;
        if !table.is_user_admin(user_id) {
            return Err(DomainError::NotAdmin {
                user_id: user_id.to_string(),
            }
            .into());
        }
        Ok(())
    }
}
