//! Membership, admin rights, settings, and standings through `TableService`.

mod support;

use chrono::Duration;
use rust_decimal_macros::dec;

use support::seed::{seed, Seeded, ADMIN, EVENT_TYPE, PASSWORD};
use tipster::domain::{ErrorKind, MatchId, MAX_STAKE};
use tipster::port::inbound::command::{
    CreateMatch, CreateTable, GetMatch, GetTable, GrantAdmin, IsUserAdmin, IsUserMember,
    JoinTable, LeaveTable, PlaceBet, RevokeAdmin, SetResult, TableStandings, UpdateTable,
};
use tipster::testkit::app::TestApp;
use tipster::testkit::domain::{event_type, t0, user};

fn new_table(name: &str, event_type_id: &str, max_players: u32) -> CreateTable {
    CreateTable {
        name: name.to_string(),
        password: PASSWORD.to_string(),
        max_players,
        stake: dec!(5),
        created_by: user(ADMIN),
        event_type_id: event_type(event_type_id),
        is_secret_mode: false,
    }
}

fn join(s: &Seeded, who: &str, password: &str) -> JoinTable {
    JoinTable {
        table_id: s.table.id().clone(),
        user_id: user(who),
        password: password.to_string(),
    }
}

fn grant(s: &Seeded, by: &str, target: &str) -> GrantAdmin {
    GrantAdmin {
        table_id: s.table.id().clone(),
        requesting_user: user(by),
        target_user: user(target),
    }
}

fn revoke(s: &Seeded, by: &str, target: &str) -> RevokeAdmin {
    RevokeAdmin {
        table_id: s.table.id().clone(),
        requesting_user: user(by),
        target_user: user(target),
    }
}

async fn office(members: &[&str]) -> Seeded {
    seed(TestApp::new(), members, dec!(10)).await
}

#[tokio::test]
async fn creator_becomes_first_admin() {
    let app = TestApp::new();
    let table = app
        .services
        .tables
        .create_table(new_table("Pub", "league", 4))
        .await
        .unwrap();

    assert_eq!(table.member_count(), 1);
    assert_eq!(table.admin_count(), 1);
    assert!(table.is_user_admin(&user(ADMIN)));
    assert_ne!(table.password_hash(), PASSWORD);

    let loaded = app
        .services
        .tables
        .get_table(GetTable {
            table_id: table.id().clone(),
        })
        .await
        .unwrap();
    assert_eq!(loaded, table);
}

#[tokio::test]
async fn invalid_table_input_is_rejected() {
    let tables = TestApp::new().services.tables;

    let zero = tables
        .create_table(new_table("Pub", "league", 0))
        .await
        .unwrap_err();
    assert_eq!(zero.code(), Some("Table.InvalidMaxPlayers"));

    let blank = tables
        .create_table(new_table(" ", "league", 4))
        .await
        .unwrap_err();
    assert_eq!(blank.code(), Some("TableName.Empty"));

    let mut negative = new_table("Pub", "league", 4);
    negative.stake = dec!(-1);
    let negative = tables.create_table(negative).await.unwrap_err();
    assert_eq!(negative.kind(), Some(ErrorKind::Validation));
    assert_eq!(negative.code(), Some("Money.Negative"));

    let mut huge = new_table("Pub", "league", 4);
    huge.stake = MAX_STAKE + dec!(1);
    let huge = tables.create_table(huge).await.unwrap_err();
    assert_eq!(huge.kind(), Some(ErrorKind::Validation));
    assert_eq!(huge.code(), Some("Table.StakeTooLarge"));
}

#[tokio::test]
async fn names_and_event_types_are_unique() {
    let tables = TestApp::new().services.tables;
    tables
        .create_table(new_table("Pub", "league", 4))
        .await
        .unwrap();

    let name = tables
        .create_table(new_table("Pub", "cup", 4))
        .await
        .unwrap_err();
    assert_eq!(name.kind(), Some(ErrorKind::Conflict));
    assert_eq!(name.code(), Some("Table.NameTaken"));

    let owned = tables
        .create_table(new_table("Bar", "league", 4))
        .await
        .unwrap_err();
    assert_eq!(owned.kind(), Some(ErrorKind::Conflict));
    assert_eq!(owned.code(), Some("Table.EventTypeTaken"));
}

#[tokio::test]
async fn full_table_rejects_third_player() {
    let app = TestApp::new();
    let table = app
        .services
        .tables
        .create_table(new_table("Duo", "league", 2))
        .await
        .unwrap();
    let join = |who: &str| JoinTable {
        table_id: table.id().clone(),
        user_id: user(who),
        password: PASSWORD.to_string(),
    };

    app.services.tables.join_table(join("u2")).await.unwrap();
    let err = app.services.tables.join_table(join("u3")).await.unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::Validation));
    assert_eq!(err.code(), Some("Table.Full"));
}

#[tokio::test]
async fn joining_checks_password_then_membership() {
    let s = office(&["ann"]).await;
    let tables = &s.app.services.tables;

    let wrong = tables.join_table(join(&s, "ben", "guess")).await.unwrap_err();
    assert_eq!(wrong.kind(), Some(ErrorKind::Forbidden));
    assert_eq!(wrong.code(), Some("Table.InvalidPassword"));

    let again = tables.join_table(join(&s, "ann", PASSWORD)).await.unwrap_err();
    assert_eq!(again.kind(), Some(ErrorKind::Conflict));
    assert_eq!(again.code(), Some("Table.AlreadyMember"));

    let missing = tables
        .join_table(JoinTable {
            table_id: tipster::domain::TableId::new(),
            user_id: user("ben"),
            password: PASSWORD.to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(missing.kind(), Some(ErrorKind::NotFound));
}

#[tokio::test]
async fn sole_admin_cannot_revoke_themselves() {
    let s = office(&[]).await;

    let err = s
        .app
        .services
        .tables
        .revoke_admin(revoke(&s, ADMIN, ADMIN))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::Validation));
    assert_eq!(err.code(), Some("Table.CannotRevokeLastAdmin"));
}

#[tokio::test]
async fn granting_admin_rights() {
    let s = office(&["ann", "ben"]).await;
    let tables = &s.app.services.tables;

    let by_member = tables.grant_admin(grant(&s, "ann", "ben")).await.unwrap_err();
    assert_eq!(by_member.kind(), Some(ErrorKind::Forbidden));

    let outsider = tables
        .grant_admin(grant(&s, ADMIN, "stranger"))
        .await
        .unwrap_err();
    assert_eq!(outsider.kind(), Some(ErrorKind::NotFound));
    assert_eq!(outsider.code(), Some("Table.MemberNotFound"));

    let table = tables.grant_admin(grant(&s, ADMIN, "ann")).await.unwrap();
    assert_eq!(table.admin_count(), 2);

    let twice = tables.grant_admin(grant(&s, ADMIN, "ann")).await.unwrap_err();
    assert_eq!(twice.kind(), Some(ErrorKind::Conflict));
    assert_eq!(twice.code(), Some("Table.AlreadyAdmin"));

    let table = tables.revoke_admin(revoke(&s, "ann", ADMIN)).await.unwrap();
    assert!(!table.is_user_admin(&user(ADMIN)));
    assert!(table.is_user_admin(&user("ann")));

    let not_admin = tables.revoke_admin(revoke(&s, "ann", "ben")).await.unwrap_err();
    assert_eq!(not_admin.code(), Some("Table.TargetNotAdmin"));
}

#[tokio::test]
async fn admin_count_never_drops_to_zero() {
    let s = office(&["ann", "ben"]).await;
    let tables = &s.app.services.tables;
    let steps: [(&str, &str, &str, bool); 8] = [
        ("grant", ADMIN, "ann", true),
        ("revoke", "ann", ADMIN, true),
        ("revoke", "ann", "ann", false),
        ("grant", "ann", "ben", true),
        ("revoke", "ben", "ann", true),
        ("revoke", "ben", "ben", false),
        ("grant", "ben", ADMIN, true),
        ("revoke", ADMIN, "ben", true),
    ];

    for (op, by, target, ok) in steps {
        let outcome = match op {
            "grant" => tables.grant_admin(grant(&s, by, target)).await,
            _ => tables.revoke_admin(revoke(&s, by, target)).await,
        };
        assert_eq!(outcome.is_ok(), ok, "{op} {target} by {by}");

        let table = tables
            .get_table(GetTable {
                table_id: s.table.id().clone(),
            })
            .await
            .unwrap();
        assert!(table.admin_count() >= 1, "after {op} {target} by {by}");
    }
}

#[tokio::test]
async fn leaving_a_table() {
    let s = office(&["ann"]).await;
    let tables = &s.app.services.tables;
    let leave = |who: &str| LeaveTable {
        table_id: s.table.id().clone(),
        user_id: user(who),
    };

    let last_admin = tables.leave_table(leave(ADMIN)).await.unwrap_err();
    assert_eq!(last_admin.code(), Some("Table.CannotRemoveLastAdmin"));

    let stranger = tables.leave_table(leave("stranger")).await.unwrap_err();
    assert_eq!(stranger.kind(), Some(ErrorKind::NotFound));

    let table = tables.leave_table(leave("ann")).await.unwrap();
    assert!(!table.is_user_member(&user("ann")));
}

#[tokio::test]
async fn leaving_withdraws_bets_on_matches_not_yet_started() {
    let s = office(&["ann", "ben"]).await;
    let matches = &s.app.services.matches;
    let early = matches
        .create_match(CreateMatch {
            requested_by: user(ADMIN),
            event_type_id: event_type(EVENT_TYPE),
            country1: "Chile".to_string(),
            country2: "Peru".to_string(),
            scheduled_at: t0() + Duration::hours(1),
        })
        .await
        .unwrap();
    for match_id in [early.id(), s.fixture.id()] {
        for who in ["ann", "ben"] {
            matches
                .place_bet(PlaceBet {
                    match_id: match_id.clone(),
                    user_id: user(who),
                    prediction: "1:0".to_string(),
                })
                .await
                .unwrap();
        }
    }

    // The early match is under way; the seeded one kicks off later.
    s.app.clock.set(t0() + Duration::minutes(90));
    s.app
        .services
        .tables
        .leave_table(LeaveTable {
            table_id: s.table.id().clone(),
            user_id: user("ann"),
        })
        .await
        .unwrap();

    let get = |id: &MatchId| GetMatch { match_id: id.clone() };
    let later = matches.get_match(get(s.fixture.id())).await.unwrap();
    assert!(later.bet_for(&user("ann")).is_none());
    assert!(later.bet_for(&user("ben")).is_some());

    let started = matches.get_match(get(early.id())).await.unwrap();
    assert_eq!(started.bet_count(), 2);
}

#[tokio::test]
async fn membership_queries() {
    let s = office(&["ann"]).await;
    let tables = &s.app.services.tables;
    let admin = |who: &str| IsUserAdmin {
        table_id: s.table.id().clone(),
        user_id: user(who),
    };
    let member = |who: &str| IsUserMember {
        table_id: s.table.id().clone(),
        user_id: user(who),
    };

    assert!(tables.is_user_admin(admin(ADMIN)).await.unwrap());
    assert!(!tables.is_user_admin(admin("ann")).await.unwrap());
    assert!(tables.is_user_member(member("ann")).await.unwrap());
    assert!(!tables.is_user_member(member("ben")).await.unwrap());
}

#[tokio::test]
async fn settings_update_rules() {
    let s = office(&["ann", "ben"]).await;
    let tables = &s.app.services.tables;
    let update = |by: &str, name: &str, max_players: u32| UpdateTable {
        table_id: s.table.id().clone(),
        requesting_user: user(by),
        name: name.to_string(),
        max_players,
        stake: dec!(2.50),
        is_secret_mode: true,
    };

    let member = tables.update_table(update("ann", "Office", 10)).await.unwrap_err();
    assert_eq!(member.kind(), Some(ErrorKind::Forbidden));

    let shrink = tables.update_table(update(ADMIN, "Office", 2)).await.unwrap_err();
    assert_eq!(shrink.code(), Some("Table.MaxPlayersBelowMembers"));

    tables
        .create_table(new_table("Taken", "other", 4))
        .await
        .unwrap();
    let taken = tables.update_table(update(ADMIN, "Taken", 10)).await.unwrap_err();
    assert_eq!(taken.code(), Some("Table.NameTaken"));

    let table = tables.update_table(update(ADMIN, "Office 2", 3)).await.unwrap();
    assert_eq!(table.name().as_str(), "Office 2");
    assert_eq!(table.max_players(), 3);
    assert_eq!(table.stake().amount(), dec!(2.50));
    assert!(table.is_secret_mode());
}

#[tokio::test]
async fn standings_rank_members_by_points() {
    let s = office(&["ann", "ben", "cat"]).await;
    let second = s
        .app
        .services
        .matches
        .create_match(CreateMatch {
            requested_by: user(ADMIN),
            event_type_id: event_type(EVENT_TYPE),
            country1: "Brazil".to_string(),
            country2: "Chile".to_string(),
            scheduled_at: t0() + Duration::hours(4),
        })
        .await
        .unwrap();

    s.bet("ann", "2:1").await;
    s.bet("ben", "1:0").await;
    for (who, prediction) in [("ann", "0:1"), ("ben", "X"), ("cat", "1:1")] {
        s.app
            .services
            .matches
            .place_bet(PlaceBet {
                match_id: second.id().clone(),
                user_id: user(who),
                prediction: prediction.to_string(),
            })
            .await
            .unwrap();
    }

    s.finish("2:1").await;
    s.app.clock.set(t0() + Duration::hours(7));
    s.app
        .services
        .matches
        .set_result(SetResult {
            requested_by: user(ADMIN),
            match_id: second.id().clone(),
            score: "1:1".to_string(),
        })
        .await
        .unwrap();

    let standings = s
        .app
        .services
        .tables
        .standings(TableStandings {
            table_id: s.table.id().clone(),
        })
        .await
        .unwrap();

    let ranked: Vec<(&str, u32)> = standings
        .iter()
        .map(|st| (st.user_id.as_str(), st.points))
        .collect();
    assert_eq!(
        ranked,
        vec![("ann", 3), ("cat", 3), ("ben", 2), (ADMIN, 0)]
    );
}
