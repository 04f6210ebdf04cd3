//! Integration tests for driving playback over HTTP.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test(start_paused = true)]
async fn test_payment_failure_plays_to_completion_and_replays() {
    let state = common::build_test_state();

    // Select the scenario.
    let app = common::build_test_app(state.clone());
    let body = json!({ "scenario": "paymentFailure" });
    let (status, json) =
        common::post_json(app, "/api/v1/playback/select-scenario", Some(&body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_steps"], 13);

    // Play through every step.
    let app = common::build_test_app(state.clone());
    let (status, _) = common::post_json(app, "/api/v1/playback/play", None).await;
    assert_eq!(status, StatusCode::OK);
    tokio::time::sleep(Duration::from_secs(10)).await;

    let app = common::build_test_app(state.clone());
    let (status, json) = common::get_json(app, "/api/v1/playback").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["is_finished"], true);
    assert_eq!(json["is_playing"], false);
    assert_eq!(json["next_action"], "replay");
    assert_eq!(json["step_number"], 13);
    assert_eq!(json["completed"].as_array().unwrap().len(), 13);

    // Playing again starts over.
    let app = common::build_test_app(state.clone());
    let (status, json) = common::post_json(app, "/api/v1/playback/play", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["current_index"], 0);
    assert_eq!(json["is_playing"], true);

    // The journal holds the whole history with contiguous sequence numbers.
    let app = common::build_test_app(state);
    let (status, json) = common::get_json(app, "/api/v1/playback/events").await;
    assert_eq!(status, StatusCode::OK);
    let events = json.as_array().unwrap();
    let types: Vec<&str> = events
        .iter()
        .map(|e| e["event_type"].as_str().unwrap())
        .collect();
    assert_eq!(types.first(), Some(&"playback.scenario_selected"));
    assert_eq!(
        types.iter().filter(|t| **t == "playback.step_completed").count(),
        13
    );
    assert_eq!(
        &types[types.len() - 3..],
        &["playback.finished", "playback.reset", "playback.started"]
    );
    for (index, event) in events.iter().enumerate() {
        assert_eq!(event["sequence_number"], index + 1);
        assert_eq!(event["occurred_at"], "2026-01-15T10:00:00Z");
    }
}

#[tokio::test(start_paused = true)]
async fn test_invalid_scenario_leaves_playback_untouched() {
    let state = common::build_test_state();

    let app = common::build_test_app(state.clone());
    common::post_json(app, "/api/v1/playback/play", None).await;
    tokio::time::sleep(Duration::from_millis(600)).await;

    let app = common::build_test_app(state.clone());
    let body = json!({ "scenario": "inventoryFailure" });
    let (status, json) =
        common::post_json(app, "/api/v1/playback/select-scenario", Some(&body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid_scenario");

    let app = common::build_test_app(state);
    let (_, json) = common::get_json(app, "/api/v1/playback").await;
    assert_eq!(json["scenario"], "success");
    assert_eq!(json["is_playing"], true);
    assert_eq!(json["completed"], json!([1]));
}
