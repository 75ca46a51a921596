//! Value objects, aggregates, and the settlement engine.
//!
//! Nothing in this layer performs I/O or reads the clock; time-dependent
//! operations take `now` as a parameter.

mod bet;
mod country;
mod fixture;
mod money;
mod outcome;
mod pool;
mod prediction;
mod score;
mod stats;
mod table;
mod table_name;

pub mod error;
pub mod id;
pub mod settlement;
pub mod standing;

pub use bet::Bet;
pub use country::{Country, MAX_COUNTRY_LEN};
pub use error::{DomainError, ErrorKind};
pub use fixture::{Match, MatchStatus};
pub use id::{BetId, EventTypeId, MatchId, PoolId, TableId, UserId};
pub use money::{Money, CENT_SCALE, MAX_STAKE};
pub use outcome::{BetResult, Outcome};
pub use pool::{Pool, PoolStatus, PoolWinner};
pub use prediction::{Prediction, DRAW_TOKEN};
pub use score::Score;
pub use settlement::{settle, Payout, PoolFunding, ScoredBet, Settlement, SettlementOutcome};
pub use standing::{compute_standings, Standing};
pub use stats::UserStats;
pub use table::{Member, Table, TableSettings};
pub use table_name::{TableName, MAX_TABLE_NAME_LEN};
