//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use sagaflow_playback::application::config::PlaybackConfig;
use sagaflow_playback::application::controller::PlaybackController;
use sagaflow_playback::infrastructure::in_memory_journal::InMemoryEventJournal;
use sagaflow_test_support::FixedClock;
use tower::ServiceExt;

use sagaflow_api::state::AppState;

/// Build application state backed by the in-memory journal and a fixed clock.
pub fn build_test_state() -> AppState {
    let clock = Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ));
    let journal = Arc::new(InMemoryEventJournal::new());
    let controller = PlaybackController::spawn(PlaybackConfig::default(), clock, journal.clone());
    AppState::new(controller, journal)
}

/// Build the full app router the same way `main.rs` does.
pub fn build_test_app(state: AppState) -> Router {
    sagaflow_api::build_router(state)
}

/// Send a POST request with an optional JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method("POST").uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|value| value.as_bytes().starts_with(b"application/json"));
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if is_json {
        serde_json::from_slice(&body_bytes).unwrap()
    } else {
        serde_json::Value::Null
    };

    (status, json)
}
