//! Commands and queries accepted by the application services.
//!
//! Fields carry raw caller input (strings, decimals); services construct the
//! validated value objects so malformed input surfaces as a
//! [`DomainError`](crate::domain::DomainError) with kind `Validation`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{EventTypeId, MatchId, TableId, UserId};

/// Schedule a match for a table's event type. Table admins only.
#[derive(Debug, Clone)]
pub struct CreateMatch {
    pub requested_by: UserId,
    pub event_type_id: EventTypeId,
    pub country1: String,
    pub country2: String,
    pub scheduled_at: DateTime<Utc>,
}

/// Reschedule a match or change its countries. Table admins only.
#[derive(Debug, Clone)]
pub struct UpdateMatch {
    pub requested_by: UserId,
    pub match_id: MatchId,
    pub country1: String,
    pub country2: String,
    pub scheduled_at: DateTime<Utc>,
}

/// Delete a match without bets or result. Table admins only.
#[derive(Debug, Clone)]
pub struct DeleteMatch {
    pub requested_by: UserId,
    pub match_id: MatchId,
}

/// Place or overwrite a bet.
#[derive(Debug, Clone)]
pub struct PlaceBet {
    pub match_id: MatchId,
    pub user_id: UserId,
    pub prediction: String,
}

/// Withdraw a bet.
#[derive(Debug, Clone)]
pub struct RemoveBet {
    pub match_id: MatchId,
    pub user_id: UserId,
}

/// Record the final score. Table admins only.
#[derive(Debug, Clone)]
pub struct SetResult {
    pub requested_by: UserId,
    pub match_id: MatchId,
    pub score: String,
}

/// Fetch one match.
#[derive(Debug, Clone)]
pub struct GetMatch {
    pub match_id: MatchId,
}

/// All matches of an event type.
#[derive(Debug, Clone)]
pub struct ListTableMatches {
    pub event_type_id: EventTypeId,
}

/// Bets on a match as seen by `viewer`.
#[derive(Debug, Clone)]
pub struct MatchBets {
    pub match_id: MatchId,
    pub viewer: UserId,
}

/// Create a table; the creator becomes its first admin.
#[derive(Debug, Clone)]
pub struct CreateTable {
    pub name: String,
    pub password: String,
    pub max_players: u32,
    pub stake: Decimal,
    pub created_by: UserId,
    pub event_type_id: EventTypeId,
    pub is_secret_mode: bool,
}

/// Join a table with its password.
#[derive(Debug, Clone)]
pub struct JoinTable {
    pub table_id: TableId,
    pub user_id: UserId,
    pub password: String,
}

/// Leave a table.
#[derive(Debug, Clone)]
pub struct LeaveTable {
    pub table_id: TableId,
    pub user_id: UserId,
}

/// Promote a member to admin.
#[derive(Debug, Clone)]
pub struct GrantAdmin {
    pub table_id: TableId,
    pub requesting_user: UserId,
    pub target_user: UserId,
}

/// Demote an admin.
#[derive(Debug, Clone)]
pub struct RevokeAdmin {
    pub table_id: TableId,
    pub requesting_user: UserId,
    pub target_user: UserId,
}

/// Change table name, capacity, stake, or secret mode. Admins only.
#[derive(Debug, Clone)]
pub struct UpdateTable {
    pub table_id: TableId,
    pub requesting_user: UserId,
    pub name: String,
    pub max_players: u32,
    pub stake: Decimal,
    pub is_secret_mode: bool,
}

/// Fetch one table.
#[derive(Debug, Clone)]
pub struct GetTable {
    pub table_id: TableId,
}

/// Is the user an admin of the table?
#[derive(Debug, Clone)]
pub struct IsUserAdmin {
    pub table_id: TableId,
    pub user_id: UserId,
}

/// Is the user a member of the table?
#[derive(Debug, Clone)]
pub struct IsUserMember {
    pub table_id: TableId,
    pub user_id: UserId,
}

/// Points and accuracy of every member.
#[derive(Debug, Clone)]
pub struct TableStandings {
    pub table_id: TableId,
}

/// Settle one finished match.
#[derive(Debug, Clone)]
pub struct SettleMatch {
    pub match_id: MatchId,
}

/// Lifetime statistics of a user.
#[derive(Debug, Clone)]
pub struct GetUserStats {
    pub user_id: UserId,
}
