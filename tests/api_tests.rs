//! HTTP API Integration Tests
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use baby_log::api::{create_router, AppState};
use baby_log::event_store::EventStore;
use baby_log::utils::now_local;
use chrono::Duration;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt;

fn test_app() -> (Router, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = EventStore::open_path(temp_dir.path().join("baby.log")).unwrap();
    let app = create_router(Arc::new(AppState::new(store)), temp_dir.path().join("public"));
    (app, temp_dir)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn send_raw(app: &Router, method: &str, uri: &str, body: &'static str) -> StatusCode {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    app.clone().oneshot(request).await.unwrap().status()
}

#[tokio::test]
async fn test_milk_and_wet_example() {
    let (app, _temp_dir) = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/log",
        Some(json!({"timestamp": "2026-01-23T10:00:00Z", "type": "milk", "amount": 4.0})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "saved");

    let (status, _) = send(
        &app,
        "POST",
        "/api/log",
        Some(json!({"timestamp": "2026-01-23T11:00:00Z", "type": "wet"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, page) = send(&app, "GET", "/api/log?page=1&limit=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 2);
    assert_eq!(page["logs"][0]["type"], "wet");
    assert_eq!(page["logs"][1]["type"], "milk");
    assert_eq!(page["logs"][1]["amount"], 4.0);

    let (status, stats) = send(&app, "GET", "/api/stats?duration=all", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_milk"], 4.0);
    assert_eq!(stats["diaper_wet"], 1);
    assert_eq!(stats["diaper_bm"], 0);
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["logs"][0]["type"], "wet");
}

#[tokio::test]
async fn test_create_assigns_timestamp() {
    let (app, _temp_dir) = test_app();

    let (status, body) = send(&app, "POST", "/api/log", Some(json!({"type": "bm"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["timestamp"].is_string());

    let (_, page) = send(&app, "GET", "/api/log", None).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["page"], 1);
    assert_eq!(page["limit"], 50);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (app, _temp_dir) = test_app();

    assert_eq!(send_raw(&app, "POST", "/api/log", "{not json").await, StatusCode::BAD_REQUEST);
    assert_eq!(send_raw(&app, "POST", "/api/log", r#"{"amount": 2}"#).await, StatusCode::BAD_REQUEST);
    assert_eq!(send_raw(&app, "DELETE", "/api/log", r#"{"a": 1}"#).await, StatusCode::BAD_REQUEST);
    assert_eq!(
        send_raw(&app, "DELETE", "/api/log", r#"["yesterday"]"#).await,
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn test_invalid_pagination_defaults() {
    let (app, _temp_dir) = test_app();
    for i in 0..3 {
        let ts = format!("2026-01-23T0{}:00:00Z", i);
        send(&app, "POST", "/api/log", Some(json!({"timestamp": ts, "type": "wet"}))).await;
    }

    let (status, page) = send(&app, "GET", "/api/log?page=0&limit=abc", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["page"], 1);
    assert_eq!(page["limit"], 50);
    assert_eq!(page["logs"].as_array().unwrap().len(), 3);

    let (_, page) = send(&app, "GET", "/api/log?page=5&limit=2", None).await;
    assert_eq!(page["total"], 3);
    assert!(page["logs"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_by_timestamp_in_other_zone() {
    let (app, _temp_dir) = test_app();
    send(
        &app,
        "POST",
        "/api/log",
        Some(json!({"timestamp": "2026-01-23T14:30:00+07:00", "type": "milk", "amount": 3})),
    )
    .await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/log?timestamp=2026-01-23T07%3A30%3A00Z",
        Some(json!({"type": "breast", "side": "left", "duration": 12})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "updated");

    let (_, page) = send(&app, "GET", "/api/log", None).await;
    assert_eq!(page["logs"][0]["type"], "breast");
    assert_eq!(page["logs"][0]["side"], "left");
    assert!(page["logs"][0].get("amount").is_none());

    // Key written with an encoded '+' offset
    let (status, _) = send(
        &app,
        "PUT",
        "/api/log?timestamp=2026-01-23T14%3A30%3A00%2B07%3A00",
        Some(json!({"timestamp": "2026-01-23T15:00:00+07:00", "type": "pump", "amount": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, stats) = send(&app, "GET", "/api/stats", None).await;
    assert_eq!(stats["total_pumped"], 2.0);
    assert_eq!(stats["total_breast_time"], 0);
}

#[tokio::test]
async fn test_update_errors() {
    let (app, _temp_dir) = test_app();
    let body = json!({"type": "wet"});

    let (status, _) = send(&app, "PUT", "/api/log", Some(body.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "PUT", "/api/log?timestamp=garbage", Some(body.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, err) = send(&app, "PUT", "/api/log?timestamp=2026-01-23T07%3A30%3A00Z", Some(body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_batch_delete_and_delete_last() {
    let (app, _temp_dir) = test_app();
    for (ts, kind) in [
        ("2026-01-23T01:00:00Z", "wet"),
        ("2026-01-23T02:00:00Z", "bm"),
        ("2026-01-23T03:00:00Z", "wet+bm"),
        ("2026-01-23T04:00:00Z", "milk"),
    ] {
        send(&app, "POST", "/api/log", Some(json!({"timestamp": ts, "type": kind}))).await;
    }

    let (status, body) = send(
        &app,
        "DELETE",
        "/api/log",
        Some(json!(["2026-01-23T03:00:00+02:00", "2026-01-23T02:00:00Z", "2030-01-01T00:00:00Z"])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let (status, _) = send(&app, "DELETE", "/api/log/last", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "POST", "/api/log/last", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, err) = send(&app, "DELETE", "/api/log/last", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"], "empty log");
}

#[tokio::test]
async fn test_stats_windows() {
    let (app, _temp_dir) = test_app();
    let now = now_local();

    for (age, kind) in [(Duration::minutes(10), "wet"), (Duration::hours(5), "bm"), (Duration::days(3), "wet+bm")] {
        send(
            &app,
            "POST",
            "/api/log",
            Some(json!({"timestamp": now - age, "type": kind})),
        )
        .await;
    }

    let (_, stats) = send(&app, "GET", "/api/stats?duration=1h", None).await;
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["diaper_wet"], 1);
    assert_eq!(stats["duration"], "1h");

    let (_, stats) = send(&app, "GET", "/api/stats?duration=24h", None).await;
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["diaper_bm"], 1);

    let (_, stats) = send(&app, "GET", "/api/stats?duration=bogus", None).await;
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["diaper_wet"], 2);
    assert_eq!(stats["diaper_bm"], 2);
    assert_eq!(stats["duration"], "all");

    // Totals cover the whole window, logs only the page
    let (_, stats) = send(&app, "GET", "/api/stats?limit=1&page=2", None).await;
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["logs"].as_array().unwrap().len(), 1);
    assert_eq!(stats["logs"][0]["type"], "bm");
}

#[tokio::test]
async fn test_store_stats() {
    let (app, _temp_dir) = test_app();
    send(&app, "POST", "/api/log", Some(json!({"type": "wet"}))).await;

    let (status, info) = send(&app, "GET", "/api/store", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info["event_count"], 1);
    assert_eq!(info["backup_count"], 0);
    assert_eq!(info["skipped_lines"], 0);
    assert!(info["path"].as_str().unwrap().ends_with("baby.log"));
}

#[tokio::test]
async fn test_method_not_allowed() {
    let (app, _temp_dir) = test_app();

    let (status, _) = send(&app, "PATCH", "/api/log", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = send(&app, "POST", "/api/stats", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = send(&app, "GET", "/api/log/last", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    for (method, uri) in [
        ("HEAD", "/api/log"),
        ("HEAD", "/api/stats"),
        ("HEAD", "/api/store"),
        ("OPTIONS", "/api/log"),
        ("OPTIONS", "/api/stats"),
    ] {
        let (status, _) = send(&app, method, uri, None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{} {}", method, uri);
    }
}

#[tokio::test]
async fn test_batch_delete_accepts_space_separated_keys() {
    let (app, _temp_dir) = test_app();
    send(
        &app,
        "POST",
        "/api/log",
        Some(json!({"timestamp": "2026-01-23T10:00:00Z", "type": "wet"})),
    )
    .await;

    let (status, body) = send(&app, "DELETE", "/api/log", Some(json!(["2026-01-23 10:00:00Z"]))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn test_store_reports_total_size() {
    let (app, _temp_dir) = test_app();
    send(&app, "POST", "/api/log", Some(json!({"type": "wet"}))).await;

    let (_, info) = send(&app, "GET", "/api/store", None).await;
    assert_eq!(info["total_size_human"], info["active_log_size_human"]);
}
