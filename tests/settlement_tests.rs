//! Pool settlement, statistics, and sweeps through `SettlementService`.

mod support;

use std::time::Duration as StdDuration;

use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use support::seed::{seed, Seeded, ADMIN, EVENT_TYPE};
use tipster::domain::{BetResult, PoolStatus, SettlementOutcome, UserStats};
use tipster::infrastructure::config::pool::FundingMode;
use tipster::port::inbound::command::{
    CreateMatch, GetMatch, GetUserStats, LeaveTable, SettleMatch, UpdateTable,
};
use tipster::port::{PoolStore, StatsStore};
use tipster::testkit::app::TestApp;
use tipster::testkit::config::config;
use tipster::testkit::domain::{event_type, t0, user};

async fn office(members: &[&str], stake: Decimal) -> Seeded {
    seed(TestApp::new(), members, stake).await
}

async fn flat_office(members: &[&str], amount: Decimal) -> Seeded {
    let mut cfg = config();
    cfg.pool.funding = FundingMode::Flat;
    cfg.pool.flat_amount = Some(amount);
    seed(TestApp::with_config(cfg), members, dec!(0)).await
}

fn settle_cmd(s: &Seeded) -> SettleMatch {
    SettleMatch {
        match_id: s.fixture.id().clone(),
    }
}

async fn stats(s: &Seeded, who: &str) -> UserStats {
    s.app
        .services
        .settlement
        .user_stats(GetUserStats { user_id: user(who) })
        .await
        .unwrap()
}

#[tokio::test]
async fn exact_hit_takes_the_whole_pool() {
    let s = office(&["a", "b", "c"], dec!(10)).await;
    s.bet("a", "2:1").await;
    s.bet("b", "1:0").await;
    s.bet("c", "0:1").await;
    s.finish("2:1").await;

    let settlement = s
        .app
        .services
        .settlement
        .settle_match(settle_cmd(&s))
        .await
        .unwrap()
        .expect("settled");

    assert_eq!(settlement.outcome, SettlementOutcome::Won);
    assert_eq!(settlement.pool_amount.amount(), dec!(30));
    assert_eq!(settlement.payouts.len(), 1);
    assert_eq!(settlement.payouts[0].user_id, user("a"));
    assert_eq!(settlement.payouts[0].amount.amount(), dec!(30));

    let results: Vec<_> = settlement
        .scored
        .iter()
        .map(|b| (b.user_id.as_str(), b.result))
        .collect();
    assert_eq!(
        results,
        vec![
            ("a", BetResult::ExactHit),
            ("b", BetResult::WinnerHit),
            ("c", BetResult::Miss),
        ]
    );

    let pool = s
        .app
        .store
        .pool_for_match(s.fixture.id())
        .await
        .unwrap()
        .unwrap()
        .value;
    assert_eq!(pool.status(), PoolStatus::Won);
    assert_eq!(pool.amount().amount(), dec!(30));
    assert_eq!(pool.winners().len(), 1);

    let a = stats(&s, "a").await;
    assert_eq!((a.matches_played, a.pools_won, a.points), (1, 1, 3));
    assert_eq!(a.total_won.amount(), dec!(30));

    let b = stats(&s, "b").await;
    assert_eq!((b.matches_played, b.pools_won, b.points), (1, 0, 1));
    assert!(b.total_won.is_zero());

    let c = stats(&s, "c").await;
    assert_eq!((c.matches_played, c.points), (1, 0));
}

#[tokio::test]
async fn draw_calls_split_the_pool() {
    let s = office(&["a", "b"], dec!(10)).await;
    s.bet("a", "0:0").await;
    s.bet("b", "X").await;
    s.finish("1:1").await;

    let settlement = s
        .app
        .services
        .settlement
        .settle_match(settle_cmd(&s))
        .await
        .unwrap()
        .unwrap();

    let payouts: Vec<_> = settlement
        .payouts
        .iter()
        .map(|p| (p.user_id.as_str(), p.amount.amount()))
        .collect();
    assert_eq!(payouts, vec![("a", dec!(10)), ("b", dec!(10))]);
}

#[tokio::test]
async fn leftover_cents_go_to_first_winner() {
    let s = flat_office(&["carol", "alice", "bob"], dec!(100)).await;
    for who in ["carol", "alice", "bob"] {
        s.bet(who, "1:0").await;
    }
    s.finish("1:0").await;

    let settlement = s
        .app
        .services
        .settlement
        .settle_match(settle_cmd(&s))
        .await
        .unwrap()
        .unwrap();

    let payouts: Vec<_> = settlement
        .payouts
        .iter()
        .map(|p| (p.user_id.as_str(), p.amount.amount()))
        .collect();
    assert_eq!(
        payouts,
        vec![
            ("alice", dec!(33.34)),
            ("bob", dec!(33.33)),
            ("carol", dec!(33.33)),
        ]
    );
    assert_eq!(settlement.total_paid().unwrap().amount(), dec!(100));
}

#[tokio::test]
async fn nobody_qualifies_rolls_over() {
    let s = office(&["a", "b"], dec!(10)).await;
    s.bet("a", "0:1").await;
    s.bet("b", "0:3").await;
    s.finish("2:0").await;

    let settlement = s
        .app
        .services
        .settlement
        .settle_match(settle_cmd(&s))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(settlement.outcome, SettlementOutcome::Rollover);
    assert!(settlement.payouts.is_empty());

    let pool = s
        .app
        .store
        .pool_for_match(s.fixture.id())
        .await
        .unwrap()
        .unwrap()
        .value;
    assert_eq!(pool.status(), PoolStatus::Rollover);
    assert_eq!(pool.amount().amount(), dec!(20));
    assert!(pool.winners().is_empty());

    let a = stats(&s, "a").await;
    assert_eq!((a.matches_played, a.pools_won), (1, 0));
}

#[tokio::test]
async fn match_without_bets_rolls_over_an_empty_pool() {
    let s = office(&[], dec!(10)).await;
    s.finish("0:0").await;

    let settlement = s
        .app
        .services
        .settlement
        .settle_match(settle_cmd(&s))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(settlement.outcome, SettlementOutcome::Rollover);
    assert!(settlement.pool_amount.is_zero());
    let pool = s
        .app
        .store
        .pool_for_match(s.fixture.id())
        .await
        .unwrap()
        .expect("pool recorded")
        .value;
    assert_eq!(pool.status(), PoolStatus::Rollover);
}

#[tokio::test]
async fn stake_change_after_betting_keeps_recorded_stakes() {
    let s = office(&["a", "b", "c"], dec!(10)).await;
    s.bet("a", "2:1").await;
    s.bet("b", "1:0").await;
    s.app
        .services
        .tables
        .update_table(UpdateTable {
            table_id: s.table.id().clone(),
            requesting_user: user(ADMIN),
            name: "Office".to_string(),
            stake: dec!(1000),
            max_players: 10,
            is_secret_mode: false,
        })
        .await
        .unwrap();
    s.bet("c", "0:0").await;
    // Re-predicting keeps the stake of the first placement.
    s.bet("a", "2:1").await;
    s.finish("2:1").await;

    let settlement = s
        .app
        .services
        .settlement
        .settle_match(settle_cmd(&s))
        .await
        .unwrap()
        .expect("settled");

    assert_eq!(settlement.pool_amount.amount(), dec!(1020));
    assert_eq!(settlement.payout_for(&user("a")).unwrap().amount(), dec!(1020));

    let fixture = s
        .app
        .services
        .matches
        .get_match(GetMatch {
            match_id: s.fixture.id().clone(),
        })
        .await
        .unwrap();
    let stakes: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|who| fixture.bet_for(&user(who)).unwrap().stake().amount())
        .collect();
    assert_eq!(stakes, vec![dec!(10), dec!(10), dec!(1000)]);
}

#[tokio::test]
async fn bets_of_players_who_left_are_void() {
    let s = office(&["a", "b", "c"], dec!(10)).await;
    s.bet("a", "2:1").await;
    s.bet("b", "1:0").await;
    s.bet("c", "2:1").await;
    let leave = |who: &str| LeaveTable {
        table_id: s.table.id().clone(),
        user_id: user(who),
    };
    let tables = &s.app.services.tables;

    tables.leave_table(leave("a")).await.unwrap();
    s.app
        .clock
        .set(s.fixture.scheduled_at() + Duration::minutes(10));
    tables.leave_table(leave("c")).await.unwrap();
    s.finish("2:1").await;

    let settlement = s
        .app
        .services
        .settlement
        .settle_match(settle_cmd(&s))
        .await
        .unwrap()
        .expect("settled");

    let scored: Vec<_> = settlement
        .scored
        .iter()
        .map(|b| (b.user_id.as_str(), b.result))
        .collect();
    assert_eq!(scored, vec![("b", BetResult::WinnerHit)]);
    assert_eq!(settlement.pool_amount.amount(), dec!(10));
    assert_eq!(settlement.payout_for(&user("b")).unwrap().amount(), dec!(10));
    assert!(settlement.payout_for(&user("c")).is_none());

    let fixture = s
        .app
        .services
        .matches
        .get_match(GetMatch {
            match_id: s.fixture.id().clone(),
        })
        .await
        .unwrap();
    assert!(fixture.bet_for(&user("a")).is_none());
    assert!(fixture.bet_for(&user("c")).is_some());

    assert_eq!(stats(&s, "c").await.matches_played, 0);
    assert_eq!(stats(&s, "a").await.matches_played, 0);
}

#[tokio::test]
async fn settling_twice_changes_nothing() {
    let s = office(&["a", "b"], dec!(10)).await;
    s.bet("a", "1:0").await;
    s.bet("b", "3:0").await;
    s.finish("1:0").await;

    let settlement = &s.app.services.settlement;
    assert!(settlement.settle_match(settle_cmd(&s)).await.unwrap().is_some());
    let pool_before = s.app.store.pool_for_match(s.fixture.id()).await.unwrap();
    let stats_before = s.app.store.user_stats(&user("a")).await.unwrap();

    assert!(settlement.settle_match(settle_cmd(&s)).await.unwrap().is_none());

    let pool_after = s.app.store.pool_for_match(s.fixture.id()).await.unwrap();
    let stats_after = s.app.store.user_stats(&user("a")).await.unwrap();
    assert_eq!(pool_before, pool_after);
    assert_eq!(stats_before, stats_after);
    assert_eq!(stats_after.unwrap().value.pools_won, 1);
}

#[tokio::test]
async fn settling_an_unresolved_match_is_fatal() {
    let s = office(&["a"], dec!(10)).await;
    s.bet("a", "1:0").await;

    let err = s
        .app
        .services
        .settlement
        .settle_match(settle_cmd(&s))
        .await
        .unwrap_err();

    assert!(matches!(err, tipster::error::Error::InvariantViolation(_)));
    assert_eq!(err.kind(), None);
}

#[tokio::test]
async fn stats_accumulate_across_matches() {
    let s = office(&["a"], dec!(10)).await;
    let second = s
        .app
        .services
        .matches
        .create_match(CreateMatch {
            requested_by: user(ADMIN),
            event_type_id: event_type(EVENT_TYPE),
            country1: "Brazil".to_string(),
            country2: "Chile".to_string(),
            scheduled_at: t0() + Duration::hours(5),
        })
        .await
        .unwrap();
    s.bet("a", "1:0").await;
    s.app
        .services
        .matches
        .place_bet(tipster::port::inbound::command::PlaceBet {
            match_id: second.id().clone(),
            user_id: user("a"),
            prediction: "X".to_string(),
        })
        .await
        .unwrap();

    s.finish("1:0").await;
    s.app.clock.set(t0() + Duration::hours(7));
    s.app
        .services
        .matches
        .set_result(tipster::port::inbound::command::SetResult {
            requested_by: user(ADMIN),
            match_id: second.id().clone(),
            score: "2:2".to_string(),
        })
        .await
        .unwrap();

    let report = s.app.services.settlement.run_sweep().await.unwrap();
    assert_eq!(report.settled, 2);

    let a = stats(&s, "a").await;
    assert_eq!(a.matches_played, 2);
    assert_eq!(a.pools_won, 2);
    assert_eq!(a.points, 4);
    assert_eq!(a.exact_hits, 1);
    assert_eq!(a.winner_hits, 1);
    assert_eq!(a.total_won.amount(), dec!(20));
}

#[tokio::test]
async fn unknown_users_have_empty_stats() {
    let s = office(&[], dec!(10)).await;
    let nobody = stats(&s, "nobody").await;
    assert_eq!(nobody, UserStats::new(user("nobody")));
}

#[tokio::test]
async fn sweep_reports_each_outcome_once() {
    let s = office(&["a", "b"], dec!(10)).await;
    let matches = &s.app.services.matches;
    let schedule = |hours: i64, home: &str| CreateMatch {
        requested_by: user(ADMIN),
        event_type_id: event_type(EVENT_TYPE),
        country1: home.to_string(),
        country2: "Chile".to_string(),
        scheduled_at: t0() + Duration::hours(hours),
    };
    let missed = matches.create_match(schedule(3, "Peru")).await.unwrap();
    let pending = matches.create_match(schedule(48, "Bolivia")).await.unwrap();

    s.bet("a", "1:0").await;
    matches
        .place_bet(tipster::port::inbound::command::PlaceBet {
            match_id: missed.id().clone(),
            user_id: user("b"),
            prediction: "0:4".to_string(),
        })
        .await
        .unwrap();
    matches
        .place_bet(tipster::port::inbound::command::PlaceBet {
            match_id: pending.id().clone(),
            user_id: user("b"),
            prediction: "0:4".to_string(),
        })
        .await
        .unwrap();

    s.finish("1:0").await;
    s.app.clock.set(t0() + Duration::hours(6));
    matches
        .set_result(tipster::port::inbound::command::SetResult {
            requested_by: user(ADMIN),
            match_id: missed.id().clone(),
            score: "1:1".to_string(),
        })
        .await
        .unwrap();

    let settlement = &s.app.services.settlement;
    let first = settlement.run_sweep().await.unwrap();
    assert_eq!(first.settled, 1);
    assert_eq!(first.rolled_over, 1);
    assert_eq!(first.failed, 0);
    assert_eq!(first.total(), 2);

    let second = settlement.run_sweep().await.unwrap();
    assert_eq!(second.total(), 0);

    let open = s.app.store.pool_for_match(pending.id()).await.unwrap().unwrap();
    assert_eq!(open.value.status(), PoolStatus::Active);
}

#[tokio::test]
async fn background_sweep_settles_and_shuts_down() {
    let s = office(&["a"], dec!(10)).await;
    s.bet("a", "2:0").await;
    s.finish("2:0").await;

    let handle = s.app.services.start_settlement();

    let mut settled = false;
    for _ in 0..100 {
        let pool = s.app.store.pool_for_match(s.fixture.id()).await.unwrap();
        if pool.is_some_and(|row| row.value.status() == PoolStatus::Won) {
            settled = true;
            break;
        }
        tokio::time::sleep(StdDuration::from_millis(10)).await;
    }
    handle.shutdown().await;

    assert!(settled, "background sweep never settled the pool");
    assert_eq!(stats(&s, "a").await.pools_won, 1);
}
