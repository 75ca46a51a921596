//! A table with members and one scheduled match, ready for betting.

use chrono::Duration;
use rust_decimal::Decimal;

use tipster::domain::{Match, Table};
use tipster::port::inbound::command::{CreateMatch, CreateTable, JoinTable, PlaceBet, SetResult};
use tipster::testkit::app::TestApp;
use tipster::testkit::domain::{event_type, t0, user};

pub const ADMIN: &str = "admin";
pub const EVENT_TYPE: &str = "world-cup";
pub const PASSWORD: &str = "secret";

pub struct Seeded {
    pub app: TestApp,
    pub table: Table,
    pub fixture: Match,
}

impl Seeded {
    /// Place a bet, panicking on failure.
    pub async fn bet(&self, bettor: &str, prediction: &str) {
        self.app
            .services
            .matches
            .place_bet(PlaceBet {
                match_id: self.fixture.id().clone(),
                user_id: user(bettor),
                prediction: prediction.to_string(),
            })
            .await
            .unwrap_or_else(|e| panic!("bet by {bettor} on {prediction}: {e}"));
    }

    /// Move past kickoff and record `score`.
    pub async fn finish(&self, score: &str) {
        self.app.clock.set(self.fixture.scheduled_at() + Duration::minutes(100));
        self.app
            .services
            .matches
            .set_result(SetResult {
                requested_by: user(ADMIN),
                match_id: self.fixture.id().clone(),
                score: score.to_string(),
            })
            .await
            .expect("set result");
    }
}

/// Table owned by [`ADMIN`] with `members` joined, plus Japan vs Korea two
/// hours after `t0`.
pub async fn seed(app: TestApp, members: &[&str], stake: Decimal) -> Seeded {
    let services = &app.services;
    let table = services
        .tables
        .create_table(CreateTable {
            name: "Office".to_string(),
            password: PASSWORD.to_string(),
            max_players: 10,
            stake,
            created_by: user(ADMIN),
            event_type_id: event_type(EVENT_TYPE),
            is_secret_mode: false,
        })
        .await
        .expect("create table");

    for member in members {
        services
            .tables
            .join_table(JoinTable {
                table_id: table.id().clone(),
                user_id: user(member),
                password: PASSWORD.to_string(),
            })
            .await
            .expect("join table");
    }

    let fixture = services
        .matches
        .create_match(CreateMatch {
            requested_by: user(ADMIN),
            event_type_id: event_type(EVENT_TYPE),
            country1: "Japan".to_string(),
            country2: "Korea".to_string(),
            scheduled_at: t0() + Duration::hours(2),
        })
        .await
        .expect("create match");

    Seeded {
        app,
        table,
        fixture,
    }
}
