//! Per-user lifetime statistics maintained by settlement.

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::UserId;
use super::money::Money;
use super::outcome::BetResult;

/// Running totals for one user across every settled match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub user_id: UserId,
    pub matches_played: u32,
    pub pools_won: u32,
    pub total_won: Money,
    pub points: u32,
    pub exact_hits: u32,
    pub winner_hits: u32,
}

impl UserStats {
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            matches_played: 0,
            pools_won: 0,
            total_won: Money::ZERO,
            points: 0,
            exact_hits: 0,
            winner_hits: 0,
        }
    }

    /// Fold one settled bet into the totals.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MoneyOverflow`] if `total_won` would overflow;
    /// the totals are left unchanged.
    pub fn record(&mut self, result: BetResult, payout: Option<Money>) -> Result<(), DomainError> {
        let total_won = match payout {
            Some(amount) => self.total_won.checked_add(amount)?,
            None => self.total_won,
        };
        self.matches_played += 1;
        self.points += result.points();
        match result {
            BetResult::ExactHit => self.exact_hits += 1,
            BetResult::WinnerHit => self.winner_hits += 1,
            BetResult::Pending | BetResult::Miss => {}
        }
        if payout.is_some() {
            self.pools_won += 1;
        }
        self.total_won = total_won;
        Ok(())
    }
}
