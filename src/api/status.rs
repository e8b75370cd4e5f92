//! Status Routes
//!
//! Health checks and status endpoints.
//!
//! Routes:
//! - GET /health - Basic health check
//! - GET /health/live - Liveness check (server responding)
//! - GET /status - Uptime and artifact store statistics

use std::sync::OnceLock;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use mdgen_storage::StoreStats;
use serde::Serialize;

use crate::AppState;

static STARTUP_TIME: OnceLock<Instant> = OnceLock::new();

/// Initialize startup time. Call this once at server start.
pub fn init_startup_time() {
    let _ = STARTUP_TIME.get_or_init(Instant::now);
}

/// Get uptime in seconds since server start.
fn get_uptime_seconds() -> u64 {
    STARTUP_TIME.get().map(|start| start.elapsed().as_secs()).unwrap_or(0)
}

/// Build status routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness_check))
        .route("/status", get(system_status))
}

// ============================================================================
// Response Types
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

/// System status response.
#[derive(Debug, Serialize)]
pub struct SystemStatusResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub storage: StoreStats,
}

// ============================================================================
// Handlers
// ============================================================================

/// Basic health check.
///
/// GET /health
#[axum::debug_handler]
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").into(),
        timestamp: Utc::now(),
    })
}

/// Liveness check.
///
/// GET /health/live
#[axum::debug_handler]
async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

/// Uptime and storage statistics.
///
/// GET /status
#[axum::debug_handler]
async fn system_status(State(state): State<AppState>) -> Json<SystemStatusResponse> {
    Json(SystemStatusResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: get_uptime_seconds(),
        storage: state.store.stats().await,
    })
}
