//! Sagaflow API: HTTP surface over the playback controller and the
//! scenario catalogue.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Builds the application router with every route mounted.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/playback", routes::playback::router())
        .nest("/api/v1/scenarios", routes::scenarios::router())
        .nest("/api/v1/participants", routes::participants::router())
        .with_state(state)
}
