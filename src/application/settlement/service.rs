//! Settlement use cases.
//!
//! Settling a match scores the bets of current table members, fixes the pool
//! amount, pays the winning tier or rolls the pool over, and folds each
//! counted bet into its user's statistics. All of it commits in one unit of work; the pool's move out of
//! `active` is the gate that keeps a match from settling twice.

use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tracing::{debug, error, info, warn};

use crate::application::retry::with_conflict_retry;
use crate::domain::{
    settle, Bet, DomainError, Match, MatchId, Pool, PoolFunding, Settlement, SettlementOutcome,
    Table, UserStats,
};
use crate::error::{Error, Result};
use crate::port::inbound::command::{GetUserStats, SettleMatch};
use crate::port::outbound::clock::Clock;
use crate::port::outbound::store::{Store, UnitOfWork, Versioned};

const DEFAULT_CONCURRENCY: usize = 4;
const DEFAULT_CONFLICT_RETRIES: u32 = 1;

/// Counts from one settlement sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Pools paid out to winners.
    pub settled: usize,
    /// Pools with no qualifying bettor.
    pub rolled_over: usize,
    /// Matches already settled by someone else.
    pub skipped: usize,
    pub failed: usize,
}

impl SweepReport {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.settled + self.rolled_over + self.skipped + self.failed
    }
}

/// Settles finished matches and maintains user statistics.
pub struct SettlementService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    funding: PoolFunding,
    concurrency: usize,
    max_conflict_retries: u32,
}

impl<S: Store> SettlementService<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, funding: PoolFunding) -> Self {
        Self {
            store,
            clock,
            funding,
            concurrency: DEFAULT_CONCURRENCY,
            max_conflict_retries: DEFAULT_CONFLICT_RETRIES,
        }
    }

    /// Matches settled in parallel by [`Self::run_sweep`]. Zero is treated
    /// as one.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    #[must_use]
    pub fn with_conflict_retries(mut self, retries: u32) -> Self {
        self.max_conflict_retries = retries;
        self
    }

    /// Settle one finished match.
    ///
    /// Returns `None` when the match's pool was already settled; repeating a
    /// settlement changes nothing. Bets of users who are no longer seated at
    /// the owning table are void: they are neither scored, funded, nor paid.
    ///
    /// # Errors
    ///
    /// - `Match.NotFound`
    /// - `Table.EventTypeNotFound` if no table owns the match's event type
    /// - `Money.Overflow` if the pool or a winner's total overflows
    /// - [`Error::InvariantViolation`] if the match has no result
    pub async fn settle_match(&self, cmd: SettleMatch) -> Result<Option<Settlement>> {
        let match_id = &cmd.match_id;
        with_conflict_retry("settle_match", self.max_conflict_retries, move || {
            self.settle_once(match_id)
        })
        .await
    }

    async fn settle_once(&self, match_id: &MatchId) -> Result<Option<Settlement>> {
        let fixture = self
            .store
            .get_match(match_id)
            .await?
            .ok_or_else(|| DomainError::MatchNotFound {
                match_id: match_id.to_string(),
            })?
            .value;
        let score = fixture.result().ok_or_else(|| {
            Error::InvariantViolation(format!("match {match_id} settled without a result"))
        })?;

        let mut work = UnitOfWork::new();
        let existing = self.store.pool_for_match(match_id).await?;
        if let Some(row) = &existing {
            if !row.value.is_active() {
                debug!(match_id = %match_id, status = %row.value.status(), "Pool already settled");
                return Ok(None);
            }
        }

        let table = self.owning_table(&fixture).await?;
        let counted: Vec<&Bet> = fixture
            .bets()
            .filter(|bet| table.value.is_user_member(bet.user_id()))
            .collect();
        if counted.len() < fixture.bet_count() {
            debug!(
                match_id = %match_id,
                void = fixture.bet_count() - counted.len(),
                "Ignoring bets of former members"
            );
        }
        let pool_amount = self.funding.amount(counted.iter().copied())?;
        let settlement = settle(score, counted, pool_amount)?;

        match existing {
            Some(mut row) => {
                row.value.apply_settlement(&settlement)?;
                work.update_pool(row);
            }
            None => {
                let mut pool = Pool::open(match_id.clone(), self.clock.now());
                pool.apply_settlement(&settlement)?;
                work.add_pool(pool);
            }
        }

        for scored in &settlement.scored {
            let loaded = self.store.user_stats(&scored.user_id).await?;
            let (mut stats, expected) = match loaded {
                Some(row) => (row.value, Some(row.version)),
                None => (UserStats::new(scored.user_id.clone()), None),
            };
            stats.record(scored.result, settlement.payout_for(&scored.user_id))?;
            work.put_stats(stats, expected);
        }
        work.check_table(&table);

        self.store.save_changes(work).await?;

        match settlement.outcome {
            SettlementOutcome::Won => info!(
                match_id = %match_id,
                score = %score,
                pool = %settlement.pool_amount,
                winners = settlement.payouts.len(),
                bettors = settlement.scored.len(),
                "Pool settled"
            ),
            SettlementOutcome::Rollover => warn!(
                match_id = %match_id,
                score = %score,
                pool = %settlement.pool_amount,
                bettors = settlement.scored.len(),
                "No winning bet, pool rolled over"
            ),
        }
        Ok(Some(settlement))
    }

    async fn owning_table(&self, fixture: &Match) -> Result<Versioned<Table>> {
        self.store
            .table_for_event_type(fixture.event_type_id())
            .await?
            .ok_or_else(|| {
                DomainError::EventTypeNotFound {
                    event_type_id: fixture.event_type_id().to_string(),
                }
                .into()
            })
    }

    /// Settle every finished match whose pool is missing or still active.
    ///
    /// Matches settle independently; one failure does not stop the others.
    ///
    /// # Errors
    ///
    /// Only if the list of unsettled matches cannot be read.
    pub async fn run_sweep(&self) -> Result<SweepReport> {
        let pending = self.store.unsettled_match_ids().await?;
        if pending.is_empty() {
            debug!("No matches awaiting settlement");
            return Ok(SweepReport::default());
        }

        let mut settling = stream::iter(pending.into_iter().map(|id| self.settle_tracked(id)))
            .buffer_unordered(self.concurrency);

        let mut report = SweepReport::default();
        while let Some((match_id, outcome)) = settling.next().await {
            match outcome {
                Ok(Some(s)) if s.outcome == SettlementOutcome::Won => report.settled += 1,
                Ok(Some(_)) => report.rolled_over += 1,
                Ok(None) => report.skipped += 1,
                Err(e) => {
                    error!(match_id = %match_id, error = %e, "Settlement failed");
                    report.failed += 1;
                }
            }
        }

        info!(
            settled = report.settled,
            rolled_over = report.rolled_over,
            skipped = report.skipped,
            failed = report.failed,
            "Settlement sweep complete"
        );
        Ok(report)
    }

    async fn settle_tracked(&self, match_id: MatchId) -> (MatchId, Result<Option<Settlement>>) {
        let outcome = self
            .settle_match(SettleMatch {
                match_id: match_id.clone(),
            })
            .await;
        (match_id, outcome)
    }

    /// Lifetime statistics of a user; zeroes if nothing was settled for them.
    ///
    /// # Errors
    ///
    /// Only on store failure.
    pub async fn user_stats(&self, query: GetUserStats) -> Result<UserStats> {
        Ok(self
            .store
            .user_stats(&query.user_id)
            .await?
            .map_or_else(|| UserStats::new(query.user_id), |row| row.value))
    }
}
