//! End-to-end API tests against a real PostgreSQL.
//!
//! These tests are `#[ignore]`d because they need a database. Connection settings
//! are read from `TEST_DB_HOST`, `TEST_DB_PORT`, `TEST_DB_NAME`, `TEST_DB_USER` and
//! `TEST_DB_PASSWORD`. The `hits` table in that database is dropped and
//! recreated, so never point them at a database you care about.
//!
//! Run with: TEST_DB_HOST=localhost cargo test --test api -- --ignored
use std::sync::OnceLock;

use axum::body::Body;
use axum::Router;
use futures::future::join_all;
use http::{Request, StatusCode};
use serde_json::Value;
use tokio::sync::{Mutex, MutexGuard};
use tower::ServiceExt;

use hitcounter::{create_router, AppConfig, AppState, Database};

/// Tests share one counter row, so they take turns.
static DB_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

struct Harness {
    app: Router,
    db: Database,
    config: AppConfig,
    _guard: MutexGuard<'static, ()>,
}

/// Build the app against the test database.
async fn harness_with(overrides: &[(&str, &str)]) -> Harness {
    assert!(
        std::env::var("TEST_DB_HOST").is_ok(),
        "TEST_DB_HOST must point at a scratch PostgreSQL database"
    );

    let guard = DB_LOCK.get_or_init(|| Mutex::new(())).lock().await;

    let config = AppConfig::from_lookup(|key| {
        overrides
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
            .or_else(|| std::env::var(format!("TEST_{key}")).ok())
    })
    .expect("test database settings should be valid");

    let db = Database::connect_lazy(&config.db);
    let app = create_router(AppState::new(config.clone(), db.clone()));

    Harness {
        app,
        db,
        config,
        _guard: guard,
    }
}

async fn harness() -> Harness {
    harness_with(&[]).await
}

async fn get_json(app: &Router, path: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn hits(app: &Router) -> i64 {
    let (status, body) = get_json(app, "/api/message").await;
    assert_eq!(status, StatusCode::OK, "unexpected body: {body}");
    body["hits"].as_i64().expect("hits should be an integer")
}

#[tokio::test]
#[ignore = "needs PostgreSQL; set TEST_DB_HOST and run with --ignored"]
async fn health_is_ok_when_database_reachable() {
    let h = harness().await;

    let (status, body) = get_json(&h.app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "ok": true }));
}

#[tokio::test]
#[ignore = "needs PostgreSQL; set TEST_DB_HOST and run with --ignored"]
async fn fresh_table_counts_from_one() {
    let h = harness().await;

    sqlx::query("DROP TABLE IF EXISTS hits")
        .execute(h.db.pool())
        .await
        .unwrap();

    assert_eq!(hits(&h.app).await, 1);
    assert_eq!(hits(&h.app).await, 2);
}

#[tokio::test]
#[ignore = "needs PostgreSQL; set TEST_DB_HOST and run with --ignored"]
async fn consecutive_calls_increment_by_one() {
    let h = harness().await;

    let first = hits(&h.app).await;
    let second = hits(&h.app).await;
    assert_eq!(second, first + 1);
}

#[tokio::test]
#[ignore = "needs PostgreSQL; set TEST_DB_HOST and run with --ignored"]
async fn concurrent_calls_are_all_counted() {
    let h = harness().await;
    const CALLS: usize = 25;

    h.db.ensure_schema().await.unwrap();
    let before = h.db.current_hits().await.unwrap().unwrap() as i64;

    let mut seen = join_all((0..CALLS).map(|_| hits(&h.app))).await;
    seen.sort_unstable();
    seen.dedup();

    let after = h.db.current_hits().await.unwrap().unwrap() as i64;
    assert_eq!(after, before + CALLS as i64);
    assert_eq!(seen.len(), CALLS, "every call should observe a distinct count");
    assert_eq!(seen.first().copied(), Some(before + 1));
    assert_eq!(seen.last().copied(), Some(after));
}

#[tokio::test]
#[ignore = "needs PostgreSQL; set TEST_DB_HOST and run with --ignored"]
async fn ensure_schema_never_resets_count() {
    let h = harness().await;

    hits(&h.app).await;
    let before = h.db.current_hits().await.unwrap();
    for _ in 0..5 {
        h.db.ensure_schema().await.unwrap();
    }
    assert_eq!(h.db.current_hits().await.unwrap(), before);
}

#[tokio::test]
#[ignore = "needs PostgreSQL; set TEST_DB_HOST and run with --ignored"]
async fn message_echoes_config_without_password() {
    let h = harness_with(&[("APP_MESSAGE", "Custom")]).await;

    let (status, body) = get_json(&h.app, "/api/message").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Custom");
    assert_eq!(body["db"]["host"], h.config.db.host.as_str());
    assert_eq!(body["db"]["name"], h.config.db.name.as_str());
    assert_eq!(body["db"]["user"], h.config.db.user.as_str());
    assert!(body["db"].get("password").is_none());
    if !h.config.db.password.is_empty() {
        assert!(!body.to_string().contains(&h.config.db.password));
    }
}

#[tokio::test]
#[ignore = "needs PostgreSQL; set TEST_DB_HOST and run with --ignored"]
async fn health_fails_on_wrong_port() {
    let h = harness_with(&[("DB_PORT", "1")]).await;

    let (status, body) = get_json(&h.app, "/api/health").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["ok"], false);
    assert!(!body["error"].as_str().unwrap_or_default().is_empty());
}
