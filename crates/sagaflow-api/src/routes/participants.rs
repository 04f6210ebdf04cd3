//! Routes for the participant list.

use axum::{Json, Router, routing::get};
use sagaflow_scenarios::application::query_handlers::{self, ParticipantView};

use crate::state::AppState;

/// GET /
async fn list_participants() -> Json<Vec<ParticipantView>> {
    Json(query_handlers::list_participants())
}

/// Returns the router for participants.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_participants))
}
