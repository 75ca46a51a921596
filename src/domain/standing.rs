//! Raw per-user points and accuracy for a table.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::fixture::Match;
use super::id::UserId;
use super::outcome::BetResult;

/// Decimal places accuracy is rounded to.
const ACCURACY_SCALE: u32 = 4;

/// One member's totals across finished matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub user_id: UserId,
    pub points: u32,
    pub exact_hits: u32,
    pub winner_hits: u32,
    /// Bets on matches with a recorded result.
    pub scored_bets: u32,
    /// Hits over scored bets, in `[0, 1]`; zero when nothing was scored.
    pub accuracy: Decimal,
}

impl Standing {
    fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            points: 0,
            exact_hits: 0,
            winner_hits: 0,
            scored_bets: 0,
            accuracy: Decimal::ZERO,
        }
    }

    fn record(&mut self, result: BetResult) {
        if result == BetResult::Pending {
            return;
        }
        self.scored_bets += 1;
        self.points += result.points();
        match result {
            BetResult::ExactHit => self.exact_hits += 1,
            BetResult::WinnerHit => self.winner_hits += 1,
            BetResult::Pending | BetResult::Miss => {}
        }
    }
}

/// Compute standings for `members` over `matches`.
///
/// Bets from users outside `members` are ignored. Every member appears, even
/// without bets. Sorted by points, then exact hits (both descending), then
/// user id.
pub fn compute_standings<'a, M, I>(members: M, matches: I) -> Vec<Standing>
where
    M: IntoIterator<Item = &'a UserId>,
    I: IntoIterator<Item = &'a Match>,
{
    let mut by_user: BTreeMap<UserId, Standing> = members
        .into_iter()
        .map(|id| (id.clone(), Standing::new(id.clone())))
        .collect();

    for m in matches {
        for (bet, result) in m.scored_bets() {
            if let Some(standing) = by_user.get_mut(bet.user_id()) {
                standing.record(result);
            }
        }
    }

    let mut standings: Vec<Standing> = by_user
        .into_values()
        .map(|mut s| {
            if s.scored_bets > 0 {
                let hits = Decimal::from(s.exact_hits + s.winner_hits);
                s.accuracy = (hits / Decimal::from(s.scored_bets)).round_dp(ACCURACY_SCALE);
            }
            s
        })
        .collect();

    standings.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.exact_hits.cmp(&a.exact_hits))
            .then(a.user_id.cmp(&b.user_id))
    });
    standings
}
