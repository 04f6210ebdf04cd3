//! Health check endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use sagaflow_scenarios::domain::scenario::ScenarioKey;
use serde::Serialize;
use uuid::Uuid;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` while the playback driver runs, `degraded` once it has stopped.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Session driven by this process.
    pub session_id: Uuid,
    /// Scenario currently loaded.
    pub scenario: ScenarioKey,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status_code, status) = if state.controller.is_running() {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let body = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        session_id: state.controller.session_id(),
        scenario: state.controller.view().scenario,
    };
    (status_code, Json(body))
}

/// Returns the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
