//! Health probe tests.

mod common;

use axum::http::{Method, StatusCode};
use common::{response_json, TestApp};

#[tokio::test]
async fn liveness_probe_is_always_up() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "up");
    assert!(!body["version"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn readiness_probe_reports_database_health() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/health/ready", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["database"]["status"], "up");

    // /status reports version info like the liveness probe.
    let response = app.request(Method::GET, "/status", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "up");
}
