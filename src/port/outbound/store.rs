//! Persistence ports for matches, tables, pools, and user statistics.
//!
//! Reads return [`Versioned`] snapshots. Writes are staged in a
//! [`UnitOfWork`] and applied by [`Store::save_changes`], which commits every
//! staged change or none of them. A change whose expected version no longer
//! matches the stored row fails the whole batch with
//! [`StoreError::Conflict`](crate::error::StoreError::Conflict).

use std::future::Future;

use crate::domain::{EventTypeId, Match, MatchId, Pool, Table, TableId, UserId, UserStats};
use crate::error::Result;

/// Row version used for optimistic concurrency.
pub type Version = u64;

/// An aggregate together with the version it was loaded at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    pub value: T,
    pub version: Version,
}

impl<T> Versioned<T> {
    pub const fn new(value: T, version: Version) -> Self {
        Self { value, version }
    }
}

/// A single staged write.
#[derive(Debug, Clone)]
pub enum Change {
    AddMatch(Match),
    UpdateMatch { entity: Match, expected: Version },
    DeleteMatch { id: MatchId, expected: Version },
    AddTable(Table),
    UpdateTable { entity: Table, expected: Version },
    /// Write nothing, but fail the batch unless the table is still at
    /// `expected`.
    CheckTable { id: TableId, expected: Version },
    AddPool(Pool),
    UpdatePool { entity: Pool, expected: Version },
    /// Insert when `expected` is `None`, otherwise update at that version.
    PutStats {
        entity: UserStats,
        expected: Option<Version>,
    },
}

/// Writes pending for one command.
#[derive(Debug, Clone, Default)]
pub struct UnitOfWork {
    changes: Vec<Change>,
}

impl UnitOfWork {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_match(&mut self, entity: Match) {
        self.changes.push(Change::AddMatch(entity));
    }

    pub fn update_match(&mut self, loaded: Versioned<Match>) {
        self.changes.push(Change::UpdateMatch {
            entity: loaded.value,
            expected: loaded.version,
        });
    }

    pub fn delete_match(&mut self, loaded: &Versioned<Match>) {
        self.changes.push(Change::DeleteMatch {
            id: loaded.value.id().clone(),
            expected: loaded.version,
        });
    }

    pub fn add_table(&mut self, entity: Table) {
        self.changes.push(Change::AddTable(entity));
    }

    pub fn update_table(&mut self, loaded: Versioned<Table>) {
        self.changes.push(Change::UpdateTable {
            entity: loaded.value,
            expected: loaded.version,
        });
    }

    /// Commit only if `loaded` is still the current table.
    pub fn check_table(&mut self, loaded: &Versioned<Table>) {
        self.changes.push(Change::CheckTable {
            id: loaded.value.id().clone(),
            expected: loaded.version,
        });
    }

    pub fn add_pool(&mut self, entity: Pool) {
        self.changes.push(Change::AddPool(entity));
    }

    pub fn update_pool(&mut self, loaded: Versioned<Pool>) {
        self.changes.push(Change::UpdatePool {
            entity: loaded.value,
            expected: loaded.version,
        });
    }

    pub fn put_stats(&mut self, entity: UserStats, expected: Option<Version>) {
        self.changes.push(Change::PutStats { entity, expected });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    #[must_use]
    pub fn into_changes(self) -> Vec<Change> {
        self.changes
    }
}

/// Reads for the Match aggregate.
pub trait MatchStore: Send + Sync {
    /// Get a match by ID.
    fn get_match(
        &self,
        id: &MatchId,
    ) -> impl Future<Output = Result<Option<Versioned<Match>>>> + Send;

    /// All matches of an event type, ordered by kickoff.
    fn matches_for_event_type(
        &self,
        event_type_id: &EventTypeId,
    ) -> impl Future<Output = Result<Vec<Match>>> + Send;

    /// Finished matches whose pool is missing or still active.
    fn unsettled_match_ids(&self) -> impl Future<Output = Result<Vec<MatchId>>> + Send;
}

/// Reads for the Table aggregate.
pub trait TableStore: Send + Sync {
    /// Get a table by ID.
    fn get_table(
        &self,
        id: &TableId,
    ) -> impl Future<Output = Result<Option<Versioned<Table>>>> + Send;

    /// The table that owns an event type.
    fn table_for_event_type(
        &self,
        event_type_id: &EventTypeId,
    ) -> impl Future<Output = Result<Option<Versioned<Table>>>> + Send;
}

/// Reads for pools.
pub trait PoolStore: Send + Sync {
    /// The pool of a match, if one was opened.
    fn pool_for_match(
        &self,
        match_id: &MatchId,
    ) -> impl Future<Output = Result<Option<Versioned<Pool>>>> + Send;
}

/// Reads for user statistics.
pub trait StatsStore: Send + Sync {
    /// Lifetime statistics of a user, if any match was settled for them.
    fn user_stats(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Option<Versioned<UserStats>>>> + Send;
}

/// Full persistence port: every read plus the atomic commit.
pub trait Store: MatchStore + TableStore + PoolStore + StatsStore {
    /// Commit every staged change, or none.
    fn save_changes(&self, work: UnitOfWork) -> impl Future<Output = Result<()>> + Send;
}
