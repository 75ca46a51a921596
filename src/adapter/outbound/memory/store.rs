//! In-process store with optimistic versioning.
//!
//! Every row carries a version starting at 1. A commit applies its changes to
//! a scratch copy of the rows and swaps it in only if every change succeeded,
//! so a failed batch leaves nothing behind.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::domain::{
    DomainError, EventTypeId, Match, MatchId, Pool, Table, TableId, UserId, UserStats,
};
use crate::error::{Result, StoreError};
use crate::port::outbound::store::{
    Change, MatchStore, PoolStore, StatsStore, Store, TableStore, UnitOfWork, Version, Versioned,
};

const FIRST_VERSION: Version = 1;

#[derive(Debug, Clone, Default)]
struct Rows {
    matches: HashMap<MatchId, Versioned<Match>>,
    tables: HashMap<TableId, Versioned<Table>>,
    /// Keyed by match: one pool per match.
    pools: HashMap<MatchId, Versioned<Pool>>,
    stats: HashMap<UserId, Versioned<UserStats>>,
}

/// Check `expected` against the stored row and return the next version.
fn next_version<T>(
    entity: &'static str,
    id: impl ToString,
    current: Option<&Versioned<T>>,
    expected: Option<Version>,
) -> std::result::Result<Version, StoreError> {
    let actual = current.map(|row| row.version);
    if actual != expected {
        return Err(StoreError::Conflict {
            entity,
            id: id.to_string(),
            expected,
            actual,
        });
    }
    Ok(actual.map_or(FIRST_VERSION, |v| v + 1))
}

impl Rows {
    fn ensure_table_unique(&self, table: &Table) -> Result<()> {
        for other in self.tables.values().map(|row| &row.value) {
            if other.id() == table.id() {
                continue;
            }
            if other.name() == table.name() {
                return Err(DomainError::TableNameTaken {
                    name: table.name().to_string(),
                }
                .into());
            }
            if other.event_type_id() == table.event_type_id() {
                return Err(DomainError::EventTypeTaken {
                    event_type_id: table.event_type_id().to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    fn apply(&mut self, change: Change) -> Result<()> {
        match change {
            Change::AddMatch(entity) => {
                let id = entity.id().clone();
                let version = next_version("match", &id, self.matches.get(&id), None)?;
                self.matches.insert(id, Versioned::new(entity, version));
            }
            Change::UpdateMatch { entity, expected } => {
                let id = entity.id().clone();
                let version = next_version("match", &id, self.matches.get(&id), Some(expected))?;
                self.matches.insert(id, Versioned::new(entity, version));
            }
            Change::DeleteMatch { id, expected } => {
                next_version("match", &id, self.matches.get(&id), Some(expected))?;
                self.matches.remove(&id);
                self.pools.remove(&id);
            }
            Change::AddTable(entity) => {
                let id = entity.id().clone();
                let version = next_version("table", &id, self.tables.get(&id), None)?;
                self.ensure_table_unique(&entity)?;
                self.tables.insert(id, Versioned::new(entity, version));
            }
            Change::UpdateTable { entity, expected } => {
                let id = entity.id().clone();
                let version = next_version("table", &id, self.tables.get(&id), Some(expected))?;
                self.ensure_table_unique(&entity)?;
                self.tables.insert(id, Versioned::new(entity, version));
            }
            Change::CheckTable { id, expected } => {
                next_version("table", &id, self.tables.get(&id), Some(expected))?;
            }
            Change::AddPool(entity) => {
                let match_id = entity.match_id().clone();
                let version = next_version("pool", &match_id, self.pools.get(&match_id), None)?;
                self.pools.insert(match_id, Versioned::new(entity, version));
            }
            Change::UpdatePool { entity, expected } => {
                let match_id = entity.match_id().clone();
                let version =
                    next_version("pool", &match_id, self.pools.get(&match_id), Some(expected))?;
                self.pools.insert(match_id, Versioned::new(entity, version));
            }
            Change::PutStats { entity, expected } => {
                let user_id = entity.user_id.clone();
                let version =
                    next_version("user_stats", &user_id, self.stats.get(&user_id), expected)?;
                self.stats.insert(user_id, Versioned::new(entity, version));
            }
        }
        Ok(())
    }
}

/// Store keeping every aggregate in memory.
///
/// Suitable for tests and single-process deployments; all state is lost when
/// the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<Rows>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MatchStore for MemoryStore {
    async fn get_match(&self, id: &MatchId) -> Result<Option<Versioned<Match>>> {
        Ok(self.rows.read().matches.get(id).cloned())
    }

    async fn matches_for_event_type(&self, event_type_id: &EventTypeId) -> Result<Vec<Match>> {
        let rows = self.rows.read();
        let mut matches: Vec<Match> = rows
            .matches
            .values()
            .filter(|row| row.value.event_type_id() == event_type_id)
            .map(|row| row.value.clone())
            .collect();
        matches.sort_by(|a, b| {
            a.scheduled_at()
                .cmp(&b.scheduled_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(matches)
    }

    async fn unsettled_match_ids(&self) -> Result<Vec<MatchId>> {
        let rows = self.rows.read();
        let mut pending: Vec<&Match> = rows
            .matches
            .values()
            .map(|row| &row.value)
            .filter(|m| m.is_finished())
            .filter(|m| rows.pools.get(m.id()).map_or(true, |p| p.value.is_active()))
            .collect();
        pending.sort_by_key(|m| m.scheduled_at());
        Ok(pending.into_iter().map(|m| m.id().clone()).collect())
    }
}

impl TableStore for MemoryStore {
    async fn get_table(&self, id: &TableId) -> Result<Option<Versioned<Table>>> {
        Ok(self.rows.read().tables.get(id).cloned())
    }

    async fn table_for_event_type(
        &self,
        event_type_id: &EventTypeId,
    ) -> Result<Option<Versioned<Table>>> {
        Ok(self
            .rows
            .read()
            .tables
            .values()
            .find(|row| row.value.event_type_id() == event_type_id)
            .cloned())
    }
}

impl PoolStore for MemoryStore {
    async fn pool_for_match(&self, match_id: &MatchId) -> Result<Option<Versioned<Pool>>> {
        Ok(self.rows.read().pools.get(match_id).cloned())
    }
}

impl StatsStore for MemoryStore {
    async fn user_stats(&self, user_id: &UserId) -> Result<Option<Versioned<UserStats>>> {
        Ok(self.rows.read().stats.get(user_id).cloned())
    }
}

impl Store for MemoryStore {
    async fn save_changes(&self, work: UnitOfWork) -> Result<()> {
        if work.is_empty() {
            return Ok(());
        }
        let count = work.len();

        let mut rows = self.rows.write();
        let mut scratch = rows.clone();
        for change in work.into_changes() {
            if let Err(e) = scratch.apply(change) {
                warn!(error = %e, "Rejected unit of work");
                return Err(e);
            }
        }
        *rows = scratch;

        debug!(changes = count, "Committed unit of work");
        Ok(())
    }
}
