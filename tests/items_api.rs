//! Item API Tests
//!
//! Drives the full router (extractors, handlers, units of work, SQLite) with
//! in-process requests:
//! - Create then read returns the same name
//! - Update is a full replace of `name` and is idempotent
//! - Delete then read is not-found
//! - Unknown ids are not-found for every operation
//! - Invalid input is a 422 and never reaches storage

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use itemstore::http_server::{HttpServer, HttpServerConfig};
use itemstore::session::{Database, DatabaseConfig};
use serde_json::{json, Value};
use sqlx::{Connection, SqliteConnection};
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

// =============================================================================
// Helper Functions
// =============================================================================

async fn setup() -> (TempDir, Database, Router) {
    let tmp = TempDir::new().unwrap();
    let url = format!("sqlite://{}", tmp.path().join("items.db").display());

    let db = Database::connect(&DatabaseConfig::new(url)).await.unwrap();
    db.bootstrap().await.unwrap();

    let router = HttpServer::new(HttpServerConfig::default(), db.clone()).router();
    (tmp, db, router)
}

async fn send_raw(
    router: &Router,
    method: &str,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    match body {
        Some(body) => {
            send_raw(router, method, uri, Some("application/json"), &body.to_string()).await
        }
        None => send_raw(router, method, uri, None, "").await,
    }
}

fn not_found() -> Value {
    json!({"detail": "Item not found"})
}

// =============================================================================
// Scenario Tests
// =============================================================================

/// The full create/read/update/delete walk-through.
#[tokio::test]
async fn test_crud_scenario() {
    let (_tmp, _db, router) = setup().await;

    let (status, body) = send(&router, "POST", "/items/", Some(json!({"name": "apple"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "name": "apple"}));

    let (status, body) = send(&router, "GET", "/items/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "name": "apple"}));

    let (status, body) = send(&router, "PUT", "/items/1", Some(json!({"name": "banana"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "name": "banana"}));

    let (status, body) = send(&router, "DELETE", "/items/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"detail": "Item deleted"}));

    let (status, body) = send(&router, "GET", "/items/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, not_found());

    let (status, body) = send(&router, "GET", "/items/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, not_found());
}

// =============================================================================
// Create / Read
// =============================================================================

/// Any string round-trips unchanged through create and read.
#[tokio::test]
async fn test_create_then_read_preserves_name() {
    let (_tmp, _db, router) = setup().await;

    let long_name = "x".repeat(10_000);
    let names: [&str; 6] = [
        "",
        "apple",
        "with spaces and \"quotes\"",
        "'; DROP TABLE items; --",
        "żółw 🐢",
        long_name.as_str(),
    ];

    for name in names {
        let (status, created) = send(&router, "POST", "/items/", Some(json!({"name": name}))).await;
        assert_eq!(status, StatusCode::OK);

        let uri = format!("/items/{}", created["id"]);
        let (status, fetched) = send(&router, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["name"], name);
        assert_eq!(fetched["id"], created["id"]);
    }
}

/// A caller-supplied id is ignored; the store assigns one.
#[tokio::test]
async fn test_create_ignores_supplied_id() {
    let (_tmp, _db, router) = setup().await;

    let (status, body) = send(&router, "POST", "/items/", Some(json!({"id": 42, "name": "apple"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "name": "apple"}));

    let (status, _) = send(&router, "GET", "/items/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Duplicate names are allowed and get distinct ids.
#[tokio::test]
async fn test_duplicate_names_get_distinct_ids() {
    let (_tmp, _db, router) = setup().await;

    let (_, first) = send(&router, "POST", "/items/", Some(json!({"name": "apple"}))).await;
    let (_, second) = send(&router, "POST", "/items/", Some(json!({"name": "apple"}))).await;
    assert_ne!(first["id"], second["id"]);
}

// =============================================================================
// Update
// =============================================================================

/// Updating twice with the same name equals updating once.
#[tokio::test]
async fn test_update_is_idempotent() {
    let (_tmp, _db, router) = setup().await;
    send(&router, "POST", "/items/", Some(json!({"name": "apple"}))).await;

    let (_, once) = send(&router, "PUT", "/items/1", Some(json!({"name": "banana"}))).await;
    let (_, twice) = send(&router, "PUT", "/items/1", Some(json!({"name": "banana"}))).await;
    assert_eq!(once, twice);

    let (_, fetched) = send(&router, "GET", "/items/1", None).await;
    assert_eq!(fetched, json!({"id": 1, "name": "banana"}));
}

/// The id in the body never changes the record's id.
#[tokio::test]
async fn test_update_keeps_id() {
    let (_tmp, _db, router) = setup().await;
    send(&router, "POST", "/items/", Some(json!({"name": "apple"}))).await;

    let (status, body) = send(&router, "PUT", "/items/1", Some(json!({"id": 5, "name": "pear"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "name": "pear"}));
}

// =============================================================================
// Delete
// =============================================================================

/// A second delete of the same id is not-found.
#[tokio::test]
async fn test_delete_twice() {
    let (_tmp, _db, router) = setup().await;
    send(&router, "POST", "/items/", Some(json!({"name": "apple"}))).await;

    let (status, _) = send(&router, "DELETE", "/items/1", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&router, "DELETE", "/items/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, not_found());
}

/// Deleting one item leaves the others alone.
#[tokio::test]
async fn test_delete_only_removes_target() {
    let (_tmp, _db, router) = setup().await;
    send(&router, "POST", "/items/", Some(json!({"name": "apple"}))).await;
    send(&router, "POST", "/items/", Some(json!({"name": "pear"}))).await;

    send(&router, "DELETE", "/items/1", None).await;

    let (status, body) = send(&router, "GET", "/items/2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 2, "name": "pear"}));
}

// =============================================================================
// Not-Found Consistency
// =============================================================================

/// Ids that were never created are not-found for read, update, and delete.
#[tokio::test]
async fn test_unknown_id_is_not_found_everywhere() {
    let (_tmp, _db, router) = setup().await;

    for id in [0, 1, 999, -3] {
        let uri = format!("/items/{}", id);

        let (status, body) = send(&router, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, not_found());

        let (status, body) = send(&router, "PUT", &uri, Some(json!({"name": "x"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, not_found());

        let (status, body) = send(&router, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, not_found());
    }
}

// =============================================================================
// Validation Gate
// =============================================================================

/// Missing or wrong-typed names are rejected and nothing is stored.
#[tokio::test]
async fn test_create_validation_never_reaches_store() {
    let (_tmp, _db, router) = setup().await;

    for payload in [
        json!({}),
        json!({"name": null}),
        json!({"name": 5}),
        json!({"name": true}),
        json!({"name": {"first": "a"}}),
        json!({"title": "apple"}),
        json!("apple"),
    ] {
        let (status, body) = send(&router, "POST", "/items/", Some(payload)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].is_string());
    }

    // Nothing was inserted, so the first successful create still gets id 1
    let (_, body) = send(&router, "POST", "/items/", Some(json!({"name": "apple"}))).await;
    assert_eq!(body["id"], 1);
}

/// Bodies that are not JSON are validation errors.
#[tokio::test]
async fn test_malformed_bodies_are_validation_errors() {
    let (_tmp, _db, router) = setup().await;

    let (status, _) = send_raw(&router, "POST", "/items/", Some("application/json"), "{\"name\":").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send_raw(&router, "POST", "/items/", Some("application/json"), "").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send_raw(&router, "POST", "/items/", None, "{\"name\":\"apple\"}").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

/// A rejected update leaves the stored name unchanged.
#[tokio::test]
async fn test_update_validation_keeps_record() {
    let (_tmp, _db, router) = setup().await;
    send(&router, "POST", "/items/", Some(json!({"name": "apple"}))).await;

    let (status, _) = send(&router, "PUT", "/items/1", Some(json!({"name": 7}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = send(&router, "GET", "/items/1", None).await;
    assert_eq!(body, json!({"id": 1, "name": "apple"}));
}

/// Validation takes precedence over not-found.
#[tokio::test]
async fn test_update_validation_before_not_found() {
    let (_tmp, _db, router) = setup().await;

    let (status, _) = send(&router, "PUT", "/items/999", Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

/// Non-integer ids are validation errors, not not-found.
#[tokio::test]
async fn test_non_integer_id() {
    let (_tmp, _db, router) = setup().await;

    for method in ["GET", "DELETE"] {
        let (status, body) = send(&router, method, "/items/apple", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].is_string());
    }

    let (status, _) = send(&router, "PUT", "/items/1.5", Some(json!({"name": "x"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// =============================================================================
// Persistence Failures
// =============================================================================

/// Storage failures are generic 500s with no internal detail.
#[tokio::test]
async fn test_storage_failure_is_internal_error() {
    let (_tmp, db, router) = setup().await;
    db.close().await;

    let (status, body) = send(&router, "POST", "/items/", Some(json!({"name": "apple"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"detail": "Internal server error"}));

    let (status, body) = send(&router, "GET", "/items/1", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"detail": "Internal server error"}));
}

// =============================================================================
// Concurrency
// =============================================================================

/// A create whose request future is dropped mid-transaction leaves no row
/// behind and does not consume an id.
#[tokio::test]
async fn test_cancelled_create_rolls_back() {
    let (tmp, _db, router) = setup().await;

    // A second writer holds the lock so the create stalls inside its unit of work
    let url = format!("sqlite://{}", tmp.path().join("items.db").display());
    let mut writer = SqliteConnection::connect(&url).await.unwrap();
    sqlx::query("BEGIN IMMEDIATE").execute(&mut writer).await.unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/items/")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"name": "apple"}"#))
        .unwrap();
    let cancelled =
        tokio::time::timeout(Duration::from_millis(200), router.clone().oneshot(request)).await;
    assert!(cancelled.is_err());

    sqlx::query("ROLLBACK").execute(&mut writer).await.unwrap();
    writer.close().await.unwrap();

    let (status, body) = send(&router, "GET", "/items/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, not_found());

    let (status, body) = send(&router, "POST", "/items/", Some(json!({"name": "pear"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "name": "pear"}));
}

/// Concurrent creates each get their own unit of work and a unique id.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_get_unique_ids() {
    let (_tmp, _db, router) = setup().await;

    let mut tasks = Vec::new();
    for i in 0..16 {
        let router = router.clone();
        tasks.push(tokio::spawn(async move {
            send(&router, "POST", "/items/", Some(json!({"name": format!("item-{}", i)}))).await
        }));
    }

    let mut ids = Vec::new();
    for task in tasks {
        let (status, body) = task.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        ids.push(body["id"].as_i64().unwrap());
    }

    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 16);
}

/// Concurrent updates to one id are last-writer-wins: the final name is one
/// of the submitted names.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_last_writer_wins() {
    let (_tmp, _db, router) = setup().await;
    send(&router, "POST", "/items/", Some(json!({"name": "start"}))).await;

    let names: Vec<String> = (0..8).map(|i| format!("name-{}", i)).collect();
    let mut tasks = Vec::new();
    for name in names.clone() {
        let router = router.clone();
        tasks.push(tokio::spawn(async move {
            send(&router, "PUT", "/items/1", Some(json!({"name": name}))).await
        }));
    }
    for task in tasks {
        let (status, _) = task.await.unwrap();
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = send(&router, "GET", "/items/1", None).await;
    let final_name = body["name"].as_str().unwrap().to_string();
    assert!(names.contains(&final_name));
}
