//! Routes for the scenario catalogue.

use axum::extract::Path;
use axum::{Json, Router, routing::get};
use sagaflow_scenarios::application::query_handlers::{self, ScenarioSummary, ScenarioView};
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /
async fn list_scenarios() -> Json<Vec<ScenarioSummary>> {
    Json(query_handlers::list_scenarios())
}

/// GET /{key}
#[instrument]
async fn get_scenario(Path(key): Path<String>) -> Result<Json<ScenarioView>, ApiError> {
    let view = query_handlers::get_scenario(&key)?;
    Ok(Json(view))
}

/// Returns the router for scenarios.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_scenarios))
        .route("/{key}", get(get_scenario))
}
