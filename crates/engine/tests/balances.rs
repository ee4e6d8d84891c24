use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{Engine, EngineError, ExpenseCmd, SettlementCmd, ShareSpec, SplitMethod};
use migration::MigratorTrait;

async fn engine_with_users(users: &[&str]) -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for user in users {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![(*user).into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn equal_share(user: &str) -> ShareSpec {
    ShareSpec {
        user_id: user.to_string(),
        amount_minor: None,
        percent_bp: None,
    }
}

fn exact_share(user: &str, amount_minor: i64) -> ShareSpec {
    ShareSpec {
        user_id: user.to_string(),
        amount_minor: Some(amount_minor),
        percent_bp: None,
    }
}

async fn add_expense(
    engine: &Engine,
    group_id: &str,
    payer: &str,
    amount_minor: i64,
    shares: Vec<ShareSpec>,
    method: SplitMethod,
) -> uuid::Uuid {
    engine
        .add_expense(ExpenseCmd {
            group_id: group_id.to_string(),
            payer_id: payer.to_string(),
            amount_minor,
            description: "test".to_string(),
            method,
            shares,
            user_id: payer.to_string(),
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn equal_split_produces_single_debt() {
    let (engine, _db) = engine_with_users(&["alice", "bob"]).await;
    let group_id = engine
        .create_group("Trip", &["bob".to_string()], "alice")
        .await
        .unwrap();

    add_expense(
        &engine,
        &group_id,
        "alice",
        100,
        vec![equal_share("alice"), equal_share("bob")],
        SplitMethod::Equal,
    )
    .await;

    let balances = engine.group_balances(&group_id, "alice").await.unwrap();
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].lender_id, "alice");
    assert_eq!(balances[0].borrower_id, "bob");
    assert_eq!(balances[0].amount_minor, 50);
}

#[tokio::test]
async fn three_way_cycle_cancels_to_zero_edges() {
    let (engine, _db) = engine_with_users(&["alice", "bob", "carol"]).await;
    let group_id = engine
        .create_group(
            "Flat",
            &["bob".to_string(), "carol".to_string()],
            "alice",
        )
        .await
        .unwrap();

    add_expense(
        &engine,
        &group_id,
        "alice",
        100,
        vec![exact_share("bob", 100)],
        SplitMethod::Exact,
    )
    .await;
    add_expense(
        &engine,
        &group_id,
        "bob",
        100,
        vec![exact_share("carol", 100)],
        SplitMethod::Exact,
    )
    .await;
    add_expense(
        &engine,
        &group_id,
        "carol",
        100,
        vec![exact_share("alice", 100)],
        SplitMethod::Exact,
    )
    .await;

    let balances = engine.group_balances(&group_id, "alice").await.unwrap();
    assert!(balances.is_empty());
}

#[tokio::test]
async fn chain_collapses_past_settled_member() {
    let (engine, _db) = engine_with_users(&["alice", "bob", "carol"]).await;
    let group_id = engine
        .create_group(
            "Dinner",
            &["bob".to_string(), "carol".to_string()],
            "alice",
        )
        .await
        .unwrap();

    // bob fronts 50 for alice, carol fronts 50 for bob: bob nets to zero
    // and the debt flows straight from alice to carol.
    add_expense(
        &engine,
        &group_id,
        "bob",
        50,
        vec![exact_share("alice", 50)],
        SplitMethod::Exact,
    )
    .await;
    add_expense(
        &engine,
        &group_id,
        "carol",
        50,
        vec![exact_share("bob", 50)],
        SplitMethod::Exact,
    )
    .await;

    let balances = engine.group_balances(&group_id, "alice").await.unwrap();
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].lender_id, "carol");
    assert_eq!(balances[0].borrower_id, "alice");
    assert_eq!(balances[0].amount_minor, 50);
}

#[tokio::test]
async fn settlement_reduces_outstanding_debt() {
    let (engine, _db) = engine_with_users(&["alice", "bob"]).await;
    let group_id = engine
        .create_group("Trip", &["bob".to_string()], "alice")
        .await
        .unwrap();

    add_expense(
        &engine,
        &group_id,
        "alice",
        100,
        vec![equal_share("alice"), equal_share("bob")],
        SplitMethod::Equal,
    )
    .await;

    engine
        .add_settlement(SettlementCmd {
            group_id: group_id.clone(),
            payee_id: "alice".to_string(),
            amount_minor: 30,
            user_id: "bob".to_string(),
        })
        .await
        .unwrap();

    let balances = engine.group_balances(&group_id, "alice").await.unwrap();
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].borrower_id, "bob");
    assert_eq!(balances[0].amount_minor, 20);

    let settlements = engine.list_group_settlements(&group_id, "bob").await.unwrap();
    assert_eq!(settlements.len(), 1);
    assert_eq!(settlements[0].payer_id, "bob");
}

#[tokio::test]
async fn full_settlement_clears_all_rows() {
    let (engine, _db) = engine_with_users(&["alice", "bob"]).await;
    let group_id = engine
        .create_group("Trip", &["bob".to_string()], "alice")
        .await
        .unwrap();

    add_expense(
        &engine,
        &group_id,
        "alice",
        100,
        vec![equal_share("alice"), equal_share("bob")],
        SplitMethod::Equal,
    )
    .await;
    engine
        .add_settlement(SettlementCmd {
            group_id: group_id.clone(),
            payee_id: "alice".to_string(),
            amount_minor: 50,
            user_id: "bob".to_string(),
        })
        .await
        .unwrap();

    let balances = engine.group_balances(&group_id, "bob").await.unwrap();
    assert!(balances.is_empty());
}

#[tokio::test]
async fn recompute_is_idempotent() {
    let (engine, _db) = engine_with_users(&["alice", "bob", "carol"]).await;
    let group_id = engine
        .create_group(
            "Flat",
            &["bob".to_string(), "carol".to_string()],
            "alice",
        )
        .await
        .unwrap();

    add_expense(
        &engine,
        &group_id,
        "alice",
        301,
        vec![
            equal_share("alice"),
            equal_share("bob"),
            equal_share("carol"),
        ],
        SplitMethod::Equal,
    )
    .await;

    let before = engine.group_balances(&group_id, "alice").await.unwrap();
    engine.recompute_balances(&group_id, "alice").await.unwrap();
    engine.recompute_balances(&group_id, "alice").await.unwrap();
    let after = engine.group_balances(&group_id, "alice").await.unwrap();

    assert_eq!(before, after);
}

#[tokio::test]
async fn archiving_an_expense_removes_its_effect() {
    let (engine, _db) = engine_with_users(&["alice", "bob"]).await;
    let group_id = engine
        .create_group("Trip", &["bob".to_string()], "alice")
        .await
        .unwrap();

    let expense_id = add_expense(
        &engine,
        &group_id,
        "alice",
        100,
        vec![equal_share("alice"), equal_share("bob")],
        SplitMethod::Equal,
    )
    .await;

    engine.archive_expense(expense_id, "alice").await.unwrap();

    let balances = engine.group_balances(&group_id, "alice").await.unwrap();
    assert!(balances.is_empty());

    // The fact itself stays listable, flagged.
    let expenses = engine.list_group_expenses(&group_id, "alice").await.unwrap();
    assert_eq!(expenses.len(), 1);
    assert!(expenses[0].archived);
}

#[tokio::test]
async fn split_sum_mismatch_blocks_creation() {
    let (engine, _db) = engine_with_users(&["alice", "bob"]).await;
    let group_id = engine
        .create_group("Trip", &["bob".to_string()], "alice")
        .await
        .unwrap();

    let err = engine
        .add_expense(ExpenseCmd {
            group_id: group_id.clone(),
            payer_id: "alice".to_string(),
            amount_minor: 100,
            description: "bad".to_string(),
            method: SplitMethod::Exact,
            shares: vec![exact_share("alice", 60), exact_share("bob", 30)],
            user_id: "alice".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidSplit(_)));

    let expenses = engine.list_group_expenses(&group_id, "alice").await.unwrap();
    assert!(expenses.is_empty());
}

#[tokio::test]
async fn self_settlement_rejected() {
    let (engine, _db) = engine_with_users(&["alice", "bob"]).await;
    let group_id = engine
        .create_group("Trip", &["bob".to_string()], "alice")
        .await
        .unwrap();

    let err = engine
        .add_settlement(SettlementCmd {
            group_id,
            payee_id: "alice".to_string(),
            amount_minor: 10,
            user_id: "alice".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn non_member_cannot_touch_group() {
    let (engine, _db) = engine_with_users(&["alice", "bob", "mallory"]).await;
    let group_id = engine
        .create_group("Trip", &["bob".to_string()], "alice")
        .await
        .unwrap();

    let err = engine
        .add_expense(ExpenseCmd {
            group_id: group_id.clone(),
            payer_id: "mallory".to_string(),
            amount_minor: 100,
            description: "intrusion".to_string(),
            method: SplitMethod::Equal,
            shares: vec![equal_share("mallory")],
            user_id: "mallory".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine.group_balances(&group_id, "mallory").await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn outside_payer_rejected_as_invalid_split() {
    let (engine, _db) = engine_with_users(&["alice", "bob", "carol"]).await;
    let group_id = engine
        .create_group("Trip", &["bob".to_string()], "alice")
        .await
        .unwrap();

    // carol exists but is not in the group.
    let err = engine
        .add_expense(ExpenseCmd {
            group_id,
            payer_id: "carol".to_string(),
            amount_minor: 100,
            description: "outside payer".to_string(),
            method: SplitMethod::Equal,
            shares: vec![equal_share("alice"), equal_share("bob")],
            user_id: "alice".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidSplit(_)));
}

#[tokio::test]
async fn summary_spans_groups() {
    let (engine, _db) = engine_with_users(&["alice", "bob", "carol"]).await;
    let trip = engine
        .create_group("Trip", &["bob".to_string()], "alice")
        .await
        .unwrap();
    let flat = engine
        .create_group("Flat", &["carol".to_string()], "alice")
        .await
        .unwrap();

    // bob owes alice 50 in Trip; alice owes carol 30 in Flat.
    add_expense(
        &engine,
        &trip,
        "alice",
        100,
        vec![equal_share("alice"), equal_share("bob")],
        SplitMethod::Equal,
    )
    .await;
    add_expense(
        &engine,
        &flat,
        "carol",
        30,
        vec![exact_share("alice", 30)],
        SplitMethod::Exact,
    )
    .await;

    let summary = engine.balance_summary("alice").await.unwrap();
    assert_eq!(summary.total_owed_minor, 50);
    assert_eq!(summary.total_due_minor, 30);

    let summary = engine.balance_summary("carol").await.unwrap();
    assert_eq!(summary.total_owed_minor, 30);
    assert_eq!(summary.total_due_minor, 0);
}

#[tokio::test]
async fn groups_are_listed_with_members() {
    let (engine, _db) = engine_with_users(&["alice", "bob"]).await;
    let group_id = engine
        .create_group("Trip", &["bob".to_string(), "bob".to_string()], "alice")
        .await
        .unwrap();

    let groups = engine.list_groups("bob").await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, "Trip");

    let (group, members) = engine.group_detail(&group_id, "bob").await.unwrap();
    assert_eq!(group.created_by, "alice");
    assert_eq!(members, vec!["alice".to_string(), "bob".to_string()]);
}

#[tokio::test]
async fn user_search_matches_substrings() {
    let (engine, _db) = engine_with_users(&["alice", "alina", "bob"]).await;

    let hits = engine.search_users("ali").await.unwrap();
    assert_eq!(hits, vec!["alice".to_string(), "alina".to_string()]);

    let hits = engine.search_users("zz").await.unwrap();
    assert!(hits.is_empty());

    let err = engine.search_users("  ").await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidName(_)));
}

#[tokio::test]
async fn unknown_member_blocks_group_creation() {
    let (engine, _db) = engine_with_users(&["alice"]).await;
    let err = engine
        .create_group("Trip", &["ghost".to_string()], "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    assert!(engine.list_groups("alice").await.unwrap().is_empty());
}
