//! Integration tests for the retiro-admin API
//!
//! Tests cover the passphrase gate, the open health endpoint, and the
//! sync-error path when no tabular store is configured. The aggregation
//! and export logic themselves are unit-tested in their modules; these
//! tests exercise the HTTP surface offline.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use retiro_admin::{build_router, AppState};
use retiro_common::config::EventConfig;
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot` method

fn gated_config() -> EventConfig {
    EventConfig {
        admin_passphrase: "2705".to_string(),
        ..EventConfig::default()
    }
}

fn request(uri: &str, key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(key) = key {
        builder = builder.header("x-admin-key", key);
    }
    builder.body(Body::empty()).unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

#[tokio::test]
async fn health_endpoint_requires_no_passphrase() {
    let app = build_router(AppState::new(gated_config()));
    let response = app.oneshot(request("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "retiro-admin");
}

#[tokio::test]
async fn data_routes_reject_missing_passphrase() {
    let app = build_router(AppState::new(gated_config()));

    for uri in ["/api/records", "/api/summary", "/api/export.csv"] {
        let response = app.clone().oneshot(request(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        let body = extract_json(response.into_body()).await;
        assert_eq!(body["error"], "wrong_passphrase");
    }
}

#[tokio::test]
async fn data_routes_reject_wrong_passphrase() {
    let app = build_router(AppState::new(gated_config()));
    let response = app
        .oneshot(request("/api/summary", Some("0000")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unconfigured_store_reports_sync_error() {
    // Correct passphrase, but no sheet URL: the persistent-banner error
    let app = build_router(AppState::new(gated_config()));
    let response = app
        .oneshot(request("/api/summary", Some("2705")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "sheet_sync_failed");
}

#[tokio::test]
async fn empty_passphrase_disables_the_gate() {
    let config = EventConfig::default(); // no passphrase
    let app = build_router(AppState::new(config));

    // Passes the gate, then fails on the unconfigured store
    let response = app.oneshot(request("/api/records", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
