//! Settlement engine: score bets against a result and split the pool.
//!
//! # Algorithm
//!
//! 1. Every bet is scored against the recorded [`Score`] as
//!    [`BetResult::ExactHit`], [`BetResult::WinnerHit`] or [`BetResult::Miss`].
//! 2. Winners are the bettors in the best non-empty hit tier: all exact hits if
//!    any exist, otherwise all winner hits.
//! 3. The pool is split evenly among winners, truncated to whole cents. The
//!    leftover goes to the winner with the lexicographically smallest user id,
//!    so payouts always sum to the pool amount exactly.
//! 4. With no winners (everyone missed, or nobody bet) the pool rolls over.
//!
//! This module is pure: it never reads the clock or a store, and it never
//! mutates the pool itself. See [`Pool::apply_settlement`](super::Pool::apply_settlement).

use super::bet::Bet;
use super::error::DomainError;
use super::id::UserId;
use super::money::Money;
use super::outcome::BetResult;
use super::score::Score;

/// How a match pool is funded at settlement time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolFunding {
    /// Sum of the stakes recorded on each bet when it was placed.
    PerBettor,
    /// A fixed amount per match regardless of bettors.
    Flat(Money),
}

impl PoolFunding {
    /// Amount a pool holds for the given bets.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MoneyOverflow`] if the stakes do not fit in a
    /// decimal.
    pub fn amount<'a, I>(self, bets: I) -> Result<Money, DomainError>
    where
        I: IntoIterator<Item = &'a Bet>,
    {
        match self {
            Self::PerBettor => bets
                .into_iter()
                .try_fold(Money::ZERO, |total, bet| total.checked_add(bet.stake())),
            Self::Flat(amount) => Ok(amount),
        }
    }
}

/// Whether a settled pool paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementOutcome {
    Won,
    Rollover,
}

/// One bet's scoring outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredBet {
    pub user_id: UserId,
    pub result: BetResult,
}

/// A winner's share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payout {
    pub user_id: UserId,
    pub amount: Money,
}

/// Result of settling one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub pool_amount: Money,
    pub outcome: SettlementOutcome,
    /// Every bet, ordered by user id.
    pub scored: Vec<ScoredBet>,
    /// Winners ordered by user id; empty on rollover.
    pub payouts: Vec<Payout>,
}

impl Settlement {
    /// Payout for a user, if they won.
    #[must_use]
    pub fn payout_for(&self, user_id: &UserId) -> Option<Money> {
        self.payouts
            .iter()
            .find(|p| &p.user_id == user_id)
            .map(|p| p.amount)
    }

    /// Sum of all payouts.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MoneyOverflow`] only for payouts that were not
    /// produced by [`settle`].
    pub fn total_paid(&self) -> Result<Money, DomainError> {
        self.payouts
            .iter()
            .try_fold(Money::ZERO, |total, p| total.checked_add(p.amount))
    }
}

/// Settle a finished match.
///
/// # Errors
///
/// Only fails on an internal money invariant; with at least one winner the
/// even split cannot divide by zero.
pub fn settle<'a, I>(score: &Score, bets: I, pool_amount: Money) -> Result<Settlement, DomainError>
where
    I: IntoIterator<Item = &'a Bet>,
{
    let mut scored: Vec<ScoredBet> = bets
        .into_iter()
        .map(|bet| ScoredBet {
            user_id: bet.user_id().clone(),
            result: bet.evaluate(Some(score)),
        })
        .collect();
    scored.sort_by(|a, b| a.user_id.cmp(&b.user_id));

    let tier = if scored.iter().any(|s| s.result == BetResult::ExactHit) {
        Some(BetResult::ExactHit)
    } else if scored.iter().any(|s| s.result == BetResult::WinnerHit) {
        Some(BetResult::WinnerHit)
    } else {
        None
    };

    let Some(tier) = tier else {
        return Ok(Settlement {
            pool_amount,
            outcome: SettlementOutcome::Rollover,
            scored,
            payouts: Vec::new(),
        });
    };

    let winners: Vec<&UserId> = scored
        .iter()
        .filter(|s| s.result == tier)
        .map(|s| &s.user_id)
        .collect();

    let (share, remainder) = pool_amount.split_evenly(winners.len())?;
    let first_share = share.checked_add(remainder)?;
    let payouts = winners
        .into_iter()
        .enumerate()
        .map(|(i, user_id)| Payout {
            user_id: user_id.clone(),
            // `scored` is sorted, so index 0 is the lexicographically first winner.
            amount: if i == 0 { first_share } else { share },
        })
        .collect();

    Ok(Settlement {
        pool_amount,
        outcome: SettlementOutcome::Won,
        scored,
        payouts,
    })
}
