//! Table use cases: membership, admin rights, settings, and standings.

use std::sync::Arc;

use tracing::info;

use crate::application::retry::with_conflict_retry;
use crate::domain::{
    compute_standings, DomainError, Money, Standing, Table, TableId, TableName, TableSettings,
};
use crate::error::Result;
use crate::port::inbound::command::{
    CreateTable, GetTable, GrantAdmin, IsUserAdmin, IsUserMember, JoinTable, LeaveTable,
    RevokeAdmin, TableStandings, UpdateTable,
};
use crate::port::outbound::clock::Clock;
use crate::port::outbound::password::PasswordHasher;
use crate::port::outbound::store::{Store, UnitOfWork, Versioned};

const DEFAULT_CONFLICT_RETRIES: u32 = 1;

/// Handles every command and query on the Table aggregate.
pub struct TableService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    hasher: Arc<dyn PasswordHasher>,
    max_conflict_retries: u32,
}

impl<S: Store> TableService<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            store,
            clock,
            hasher,
            max_conflict_retries: DEFAULT_CONFLICT_RETRIES,
        }
    }

    #[must_use]
    pub fn with_conflict_retries(mut self, retries: u32) -> Self {
        self.max_conflict_retries = retries;
        self
    }

    /// Create a table with the creator as its first admin.
    ///
    /// # Errors
    ///
    /// - name, stake, and `max_players` validation
    /// - `Table.NameTaken` or `Table.EventTypeTaken` from the store
    pub async fn create_table(&self, cmd: CreateTable) -> Result<Table> {
        let name = TableName::try_new(cmd.name)?;
        let stake = Money::try_new(cmd.stake)?;
        let password_hash = self.hasher.hash(&cmd.password);

        let table = Table::create(
            name,
            password_hash,
            cmd.max_players,
            stake,
            cmd.created_by,
            cmd.event_type_id,
            cmd.is_secret_mode,
            self.clock.now(),
        )?;

        let mut work = UnitOfWork::new();
        work.add_table(table.clone());
        self.store.save_changes(work).await?;

        info!(
            table_id = %table.id(),
            name = %table.name(),
            event_type = %table.event_type_id(),
            max_players = table.max_players(),
            stake = %table.stake(),
            "Table created"
        );
        Ok(table)
    }

    /// Join with the table password.
    ///
    /// # Errors
    ///
    /// `Table.NotFound`, `Table.InvalidPassword`, `Table.AlreadyMember`, or
    /// `Table.Full`.
    pub async fn join_table(&self, cmd: JoinTable) -> Result<Table> {
        let cmd = &cmd;
        with_conflict_retry("join_table", self.max_conflict_retries, move || {
            self.join_table_once(cmd)
        })
        .await
    }

    async fn join_table_once(&self, cmd: &JoinTable) -> Result<Table> {
        let mut loaded = self.load_table(&cmd.table_id).await?;
        loaded
            .value
            .add_member(cmd.user_id.clone(), self.clock.now(), |hash| {
                self.hasher.verify(hash, &cmd.password)
            })?;

        let table = self.commit(loaded).await?;
        info!(
            table_id = %cmd.table_id,
            user_id = %cmd.user_id,
            members = table.member_count(),
            "Member joined"
        );
        Ok(table)
    }

    /// Leave a table. The last admin cannot leave.
    ///
    /// The leaver's bets on the table's matches that have not kicked off are
    /// withdrawn in the same commit. Bets on started matches stay recorded
    /// but no longer count at settlement.
    ///
    /// # Errors
    ///
    /// `Table.NotFound`, `Table.MemberNotFound`, or
    /// `Table.CannotRemoveLastAdmin`.
    pub async fn leave_table(&self, cmd: LeaveTable) -> Result<Table> {
        let cmd = &cmd;
        with_conflict_retry("leave_table", self.max_conflict_retries, move || {
            self.leave_table_once(cmd)
        })
        .await
    }

    async fn leave_table_once(&self, cmd: &LeaveTable) -> Result<Table> {
        let mut loaded = self.load_table(&cmd.table_id).await?;
        loaded.value.remove_member(&cmd.user_id)?;

        let now = self.clock.now();
        let mut work = UnitOfWork::new();
        let mut withdrawn = 0_usize;
        let matches = self
            .store
            .matches_for_event_type(loaded.value.event_type_id())
            .await?;
        for fixture in matches {
            if fixture.has_started(now) || fixture.bet_for(&cmd.user_id).is_none() {
                continue;
            }
            let Some(mut row) = self.store.get_match(fixture.id()).await? else {
                continue;
            };
            if row.value.has_started(now) || row.value.bet_for(&cmd.user_id).is_none() {
                continue;
            }
            row.value.remove_bet(&cmd.user_id, now)?;
            work.update_match(row);
            withdrawn += 1;
        }

        let table = loaded.value.clone();
        work.update_table(loaded);
        self.store.save_changes(work).await?;

        info!(
            table_id = %cmd.table_id,
            user_id = %cmd.user_id,
            withdrawn_bets = withdrawn,
            "Member left"
        );
        Ok(table)
    }

    /// # Errors
    ///
    /// `Table.NotFound`, `Table.NotAdmin`, `Table.MemberNotFound`, or
    /// `Table.AlreadyAdmin`.
    pub async fn grant_admin(&self, cmd: GrantAdmin) -> Result<Table> {
        let cmd = &cmd;
        with_conflict_retry("grant_admin", self.max_conflict_retries, move || {
            self.grant_admin_once(cmd)
        })
        .await
    }

    async fn grant_admin_once(&self, cmd: &GrantAdmin) -> Result<Table> {
        let mut loaded = self.load_table(&cmd.table_id).await?;
        loaded
            .value
            .grant_admin(&cmd.requesting_user, &cmd.target_user)?;

        let table = self.commit(loaded).await?;
        info!(
            table_id = %cmd.table_id,
            by = %cmd.requesting_user,
            user_id = %cmd.target_user,
            "Admin granted"
        );
        Ok(table)
    }

    /// # Errors
    ///
    /// `Table.NotFound`, `Table.NotAdmin`, `Table.MemberNotFound`,
    /// `Table.TargetNotAdmin`, or `Table.CannotRevokeLastAdmin`.
    pub async fn revoke_admin(&self, cmd: RevokeAdmin) -> Result<Table> {
        let cmd = &cmd;
        with_conflict_retry("revoke_admin", self.max_conflict_retries, move || {
            self.revoke_admin_once(cmd)
        })
        .await
    }

    async fn revoke_admin_once(&self, cmd: &RevokeAdmin) -> Result<Table> {
        let mut loaded = self.load_table(&cmd.table_id).await?;
        loaded
            .value
            .revoke_admin(&cmd.requesting_user, &cmd.target_user)?;

        let table = self.commit(loaded).await?;
        info!(
            table_id = %cmd.table_id,
            by = %cmd.requesting_user,
            user_id = %cmd.target_user,
            "Admin revoked"
        );
        Ok(table)
    }

    /// Change name, capacity, stake, or secret mode.
    ///
    /// # Errors
    ///
    /// - name and stake validation
    /// - `Table.NotFound`, `Table.NotAdmin`
    /// - `Table.InvalidMaxPlayers`, `Table.MaxPlayersBelowMembers`
    /// - `Table.NameTaken` from the store
    pub async fn update_table(&self, cmd: UpdateTable) -> Result<Table> {
        let settings = TableSettings {
            name: TableName::try_new(cmd.name.as_str())?,
            max_players: cmd.max_players,
            stake: Money::try_new(cmd.stake)?,
            is_secret_mode: cmd.is_secret_mode,
        };
        let (cmd, settings) = (&cmd, &settings);
        with_conflict_retry("update_table", self.max_conflict_retries, move || {
            self.update_table_once(cmd, settings)
        })
        .await
    }

    async fn update_table_once(&self, cmd: &UpdateTable, settings: &TableSettings) -> Result<Table> {
        let mut loaded = self.load_table(&cmd.table_id).await?;
        loaded
            .value
            .update_settings(&cmd.requesting_user, settings.clone())?;

        let table = self.commit(loaded).await?;
        info!(
            table_id = %cmd.table_id,
            name = %table.name(),
            max_players = table.max_players(),
            stake = %table.stake(),
            secret = table.is_secret_mode(),
            "Table settings updated"
        );
        Ok(table)
    }

    /// # Errors
    ///
    /// `Table.NotFound` if no such table exists.
    pub async fn get_table(&self, query: GetTable) -> Result<Table> {
        Ok(self.load_table(&query.table_id).await?.value)
    }

    /// # Errors
    ///
    /// `Table.NotFound` if no such table exists.
    pub async fn is_user_admin(&self, query: IsUserAdmin) -> Result<bool> {
        let table = self.load_table(&query.table_id).await?.value;
        Ok(table.is_user_admin(&query.user_id))
    }

    /// # Errors
    ///
    /// `Table.NotFound` if no such table exists.
    pub async fn is_user_member(&self, query: IsUserMember) -> Result<bool> {
        let table = self.load_table(&query.table_id).await?.value;
        Ok(table.is_user_member(&query.user_id))
    }

    /// Points and accuracy of every current member over the table's
    /// finished matches.
    ///
    /// # Errors
    ///
    /// `Table.NotFound` if no such table exists.
    pub async fn standings(&self, query: TableStandings) -> Result<Vec<Standing>> {
        let table = self.load_table(&query.table_id).await?.value;
        let matches = self
            .store
            .matches_for_event_type(table.event_type_id())
            .await?;
        Ok(compute_standings(
            table.members().map(|m| m.user_id()),
            matches.iter(),
        ))
    }

    async fn load_table(&self, id: &TableId) -> Result<Versioned<Table>> {
        self.store.get_table(id).await?.ok_or_else(|| {
            DomainError::TableNotFound {
                table_id: id.to_string(),
            }
            .into()
        })
    }

    async fn commit(&self, loaded: Versioned<Table>) -> Result<Table> {
        let table = loaded.value.clone();
        let mut work = UnitOfWork::new();
        work.update_table(loaded);
        self.store.save_changes(work).await?;
        Ok(table)
    }
}
