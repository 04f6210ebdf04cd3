//! Routes for the playback controller.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use sagaflow_core::journal::StoredEvent;
use sagaflow_playback::application::query_handlers::{self, PlaybackView};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /select-scenario.
#[derive(Debug, Deserialize)]
pub struct SelectScenarioRequest {
    /// Wire name of the scenario, e.g. `paymentFailure`.
    pub scenario: String,
}

/// GET /
async fn get_playback(State(state): State<AppState>) -> Json<PlaybackView> {
    Json(state.controller.view())
}

/// POST /play
#[instrument(skip(state))]
async fn play(State(state): State<AppState>) -> Result<Json<PlaybackView>, ApiError> {
    info!("handling play request");
    Ok(Json(state.controller.play().await?))
}

/// POST /pause
#[instrument(skip(state))]
async fn pause(State(state): State<AppState>) -> Result<Json<PlaybackView>, ApiError> {
    info!("handling pause request");
    Ok(Json(state.controller.pause().await?))
}

/// POST /reset
#[instrument(skip(state))]
async fn reset(State(state): State<AppState>) -> Result<Json<PlaybackView>, ApiError> {
    info!("handling reset request");
    Ok(Json(state.controller.reset().await?))
}

/// POST /toggle
#[instrument(skip(state))]
async fn toggle(State(state): State<AppState>) -> Result<Json<PlaybackView>, ApiError> {
    info!("handling toggle request");
    Ok(Json(state.controller.toggle().await?))
}

/// POST /select-scenario
#[instrument(skip(state, request), fields(scenario = %request.scenario))]
async fn select_scenario(
    State(state): State<AppState>,
    Json(request): Json<SelectScenarioRequest>,
) -> Result<Json<PlaybackView>, ApiError> {
    info!("handling select_scenario request");
    Ok(Json(
        state.controller.select_scenario(&request.scenario).await?,
    ))
}

/// GET /events
async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<StoredEvent>>, ApiError> {
    let events =
        query_handlers::get_playback_events(state.controller.session_id(), &*state.journal)
            .await?;
    Ok(Json(events))
}

/// Returns the router for the playback controller.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_playback))
        .route("/play", post(play))
        .route("/pause", post(pause))
        .route("/reset", post(reset))
        .route("/toggle", post(toggle))
        .route("/select-scenario", post(select_scenario))
        .route("/events", get(list_events))
}
