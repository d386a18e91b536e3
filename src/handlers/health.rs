use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use sea_orm::ConnectionTrait;
use serde_json::json;

use crate::AppState;

/// Tracks application start time for uptime calculation
static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize the start time (call this on application startup)
pub fn init_start_time() {
    let _ = START_TIME.get_or_init(Instant::now);
}

fn get_uptime_secs() -> u64 {
    START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0)
}

/// Basic liveness probe - just checks if the server is running
pub async fn liveness_check() -> impl IntoResponse {
    Json(json!({
        "status": "up",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Readiness probe - verifies the database answers before reporting ready
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();

    let db_check_start = Instant::now();
    let db_result = state
        .db
        .execute_unprepared("SELECT 1")
        .await
        .map(|_| ())
        .map_err(|e| e.to_string());
    let db_latency = db_check_start.elapsed().as_millis() as u64;

    match db_result {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "uptime_secs": get_uptime_secs(),
                "checks": {
                    "database": { "status": "up", "latency_ms": db_latency }
                },
                "response_time_ms": start.elapsed().as_millis() as u64
            })),
        ),
        Err(error) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "uptime_secs": get_uptime_secs(),
                "checks": {
                    "database": { "status": "down", "error": error }
                },
                "response_time_ms": start.elapsed().as_millis() as u64
            })),
        ),
    }
}
