//! The Table aggregate: membership, capacity, and admin roles.
//!
//! # Invariants
//!
//! - member count never exceeds `max_players`
//! - the stake never exceeds [`MAX_STAKE`]
//! - the creator joins as an admin when the table is created
//! - while the table has members, at least one of them is an admin
//! - only an admin may grant or revoke admin status

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::error::DomainError;
use super::id::{EventTypeId, TableId, UserId};
use super::money::{Money, MAX_STAKE};
use super::table_name::TableName;

/// A user's seat at a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    user_id: UserId,
    is_admin: bool,
    joined_at: DateTime<Utc>,
}

impl Member {
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.is_admin
    }

    #[must_use]
    pub const fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }
}

/// Settings an admin may change after creation.
#[derive(Debug, Clone)]
pub struct TableSettings {
    pub name: TableName,
    pub max_players: u32,
    pub stake: Money,
    pub is_secret_mode: bool,
}

/// A private betting group with a fixed stake per match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    id: TableId,
    name: TableName,
    password_hash: String,
    max_players: u32,
    stake: Money,
    created_by: UserId,
    event_type_id: EventTypeId,
    created_at: DateTime<Utc>,
    is_secret_mode: bool,
    members: BTreeMap<UserId, Member>,
}

fn ensure_stake(stake: Money) -> Result<(), DomainError> {
    if stake.amount() > MAX_STAKE {
        return Err(DomainError::StakeTooLarge {
            stake: stake.amount(),
            max: MAX_STAKE,
        });
    }
    Ok(())
}

impl Table {
    /// Create a table with its creator seated as admin.
    ///
    /// # Errors
    ///
    /// - [`DomainError::InvalidMaxPlayers`] when `max_players` is zero
    /// - [`DomainError::StakeTooLarge`] above [`MAX_STAKE`]
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        name: TableName,
        password_hash: impl Into<String>,
        max_players: u32,
        stake: Money,
        created_by: UserId,
        event_type_id: EventTypeId,
        is_secret_mode: bool,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if max_players < 1 {
            return Err(DomainError::InvalidMaxPlayers { max_players });
        }
        ensure_stake(stake)?;

        let creator = Member {
            user_id: created_by.clone(),
            is_admin: true,
            joined_at: now,
        };
        let mut members = BTreeMap::new();
        members.insert(created_by.clone(), creator);

        Ok(Self {
            id: TableId::new(),
            name,
            password_hash: password_hash.into(),
            max_players,
            stake,
            created_by,
            event_type_id,
            created_at: now,
            is_secret_mode,
            members,
        })
    }

    #[must_use]
    pub const fn id(&self) -> &TableId {
        &self.id
    }

    #[must_use]
    pub const fn name(&self) -> &TableName {
        &self.name
    }

    #[must_use]
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    #[must_use]
    pub const fn max_players(&self) -> u32 {
        self.max_players
    }

    /// Amount each bettor contributes to a match pool.
    #[must_use]
    pub const fn stake(&self) -> Money {
        self.stake
    }

    #[must_use]
    pub const fn created_by(&self) -> &UserId {
        &self.created_by
    }

    #[must_use]
    pub const fn event_type_id(&self) -> &EventTypeId {
        &self.event_type_id
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn is_secret_mode(&self) -> bool {
        self.is_secret_mode
    }

    /// Members ordered by user id.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn admin_count(&self) -> usize {
        self.members.values().filter(|m| m.is_admin).count()
    }

    #[must_use]
    pub fn is_user_member(&self, user_id: &UserId) -> bool {
        self.members.contains_key(user_id)
    }

    #[must_use]
    pub fn is_user_admin(&self, user_id: &UserId) -> bool {
        self.members.get(user_id).is_some_and(|m| m.is_admin)
    }

    fn is_full(&self) -> bool {
        self.members.len() >= self.max_players as usize
    }

    fn ensure_admin(&self, user_id: &UserId) -> Result<(), DomainError> {
        if !self.is_user_admin(user_id) {
            return Err(DomainError::NotAdmin {
                user_id: user_id.to_string(),
            });
        }
        Ok(())
    }

    fn member_mut(&mut self, user_id: &UserId) -> Result<&mut Member, DomainError> {
        self.members
            .get_mut(user_id)
            .ok_or_else(|| DomainError::MemberNotFound {
                user_id: user_id.to_string(),
            })
    }

    /// Seat a new non-admin member.
    ///
    /// `password_matches` receives the stored hash and decides whether the
    /// caller supplied the right password. It is the only place the password
    /// is checked.
    ///
    /// # Errors
    ///
    /// - [`DomainError::InvalidPassword`] if `password_matches` returns false
    /// - [`DomainError::AlreadyMember`] if the user is already seated
    /// - [`DomainError::TableFull`] if the table is at capacity
    pub fn add_member<F>(
        &mut self,
        user_id: UserId,
        now: DateTime<Utc>,
        password_matches: F,
    ) -> Result<(), DomainError>
    where
        F: FnOnce(&str) -> bool,
    {
        if !password_matches(&self.password_hash) {
            return Err(DomainError::InvalidPassword);
        }
        if self.is_user_member(&user_id) {
            return Err(DomainError::AlreadyMember {
                user_id: user_id.to_string(),
            });
        }
        if self.is_full() {
            return Err(DomainError::TableFull {
                max_players: self.max_players,
            });
        }

        self.members.insert(
            user_id.clone(),
            Member {
                user_id,
                is_admin: false,
                joined_at: now,
            },
        );
        Ok(())
    }

    /// Remove a member.
    ///
    /// # Errors
    ///
    /// - [`DomainError::MemberNotFound`] if the user is not seated
    /// - [`DomainError::CannotRemoveLastAdmin`] if they are the only admin
    pub fn remove_member(&mut self, user_id: &UserId) -> Result<(), DomainError> {
        let admins = self.admin_count();
        let member = self.member_mut(user_id)?;
        if member.is_admin && admins == 1 {
            return Err(DomainError::CannotRemoveLastAdmin);
        }
        self.members.remove(user_id);
        Ok(())
    }

    /// Promote a member to admin.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NotAdmin`] if the requester is not an admin
    /// - [`DomainError::MemberNotFound`] if the target is not seated
    /// - [`DomainError::AlreadyAdmin`] if the target is already an admin
    pub fn grant_admin(&mut self, requesting: &UserId, target: &UserId) -> Result<(), DomainError> {
        self.ensure_admin(requesting)?;
        let member = self.member_mut(target)?;
        if member.is_admin {
            return Err(DomainError::AlreadyAdmin {
                user_id: target.to_string(),
            });
        }
        member.is_admin = true;
        Ok(())
    }

    /// Demote an admin to a regular member.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NotAdmin`] if the requester is not an admin
    /// - [`DomainError::MemberNotFound`] if the target is not seated
    /// - [`DomainError::TargetNotAdmin`] if the target is not an admin
    /// - [`DomainError::CannotRevokeLastAdmin`] if the target is the only admin
    pub fn revoke_admin(&mut self, requesting: &UserId, target: &UserId) -> Result<(), DomainError> {
        self.ensure_admin(requesting)?;
        let admins = self.admin_count();
        let member = self.member_mut(target)?;
        if !member.is_admin {
            return Err(DomainError::TargetNotAdmin {
                user_id: target.to_string(),
            });
        }
        if admins == 1 {
            return Err(DomainError::CannotRevokeLastAdmin);
        }
        member.is_admin = false;
        Ok(())
    }

    /// Change name, capacity, stake, or secret mode.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NotAdmin`] if the requester is not an admin
    /// - [`DomainError::InvalidMaxPlayers`] when `max_players` is zero
    /// - [`DomainError::MaxPlayersBelowMembers`] when it is below the member count
    /// - [`DomainError::StakeTooLarge`] above [`MAX_STAKE`]
    pub fn update_settings(
        &mut self,
        requesting: &UserId,
        settings: TableSettings,
    ) -> Result<(), DomainError> {
        self.ensure_admin(requesting)?;
        if settings.max_players < 1 {
            return Err(DomainError::InvalidMaxPlayers {
                max_players: settings.max_players,
            });
        }
        if (settings.max_players as usize) < self.members.len() {
            return Err(DomainError::MaxPlayersBelowMembers {
                max_players: settings.max_players,
                members: self.members.len(),
            });
        }
        ensure_stake(settings.stake)?;

        self.name = settings.name;
        self.max_players = settings.max_players;
        self.stake = settings.stake;
        self.is_secret_mode = settings.is_secret_mode;
        Ok(())
    }
}
