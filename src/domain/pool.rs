//! Per-match stake pools.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{MatchId, PoolId, UserId};
use super::money::Money;
use super::settlement::{Settlement, SettlementOutcome};

/// Lifecycle status of a pool.
///
/// `Active` is the only non-terminal status; leaving it is the gate that
/// keeps settlement at-most-once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolStatus {
    Active,
    Won,
    Rollover,
    /// A rolled-over amount taken by whatever consumes rollovers. Nothing
    /// in this crate sets it.
    Expired,
}

impl PoolStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Won => "won",
            Self::Rollover => "rollover",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for PoolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A winner's share of a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolWinner {
    pub user_id: UserId,
    pub amount_won: Money,
}

/// The stake collected for one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    id: PoolId,
    match_id: MatchId,
    amount: Money,
    status: PoolStatus,
    created_at: DateTime<Utc>,
    winners: Vec<PoolWinner>,
}

impl Pool {
    /// Open an empty, active pool for a match.
    #[must_use]
    pub fn open(match_id: MatchId, now: DateTime<Utc>) -> Self {
        Self {
            id: PoolId::new(),
            match_id,
            amount: Money::ZERO,
            status: PoolStatus::Active,
            created_at: now,
            winners: Vec::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> &PoolId {
        &self.id
    }

    #[must_use]
    pub const fn match_id(&self) -> &MatchId {
        &self.match_id
    }

    #[must_use]
    pub const fn amount(&self) -> Money {
        self.amount
    }

    #[must_use]
    pub const fn status(&self) -> PoolStatus {
        self.status
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn winners(&self) -> &[PoolWinner] {
        &self.winners
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == PoolStatus::Active
    }

    /// Record a settlement's funding, winners and terminal status.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::PoolNotActive`] if the pool was already settled.
    pub fn apply_settlement(&mut self, settlement: &Settlement) -> Result<(), DomainError> {
        if !self.is_active() {
            return Err(DomainError::PoolNotActive {
                match_id: self.match_id.to_string(),
                status: self.status.to_string(),
            });
        }

        self.amount = settlement.pool_amount;
        self.status = match settlement.outcome {
            SettlementOutcome::Won => PoolStatus::Won,
            SettlementOutcome::Rollover => PoolStatus::Rollover,
        };
        self.winners = settlement
            .payouts
            .iter()
            .map(|p| PoolWinner {
                user_id: p.user_id.clone(),
                amount_won: p.amount,
            })
            .collect();
        Ok(())
    }
}
