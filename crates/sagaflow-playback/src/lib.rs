//! Sagaflow: playback controller.
//!
//! Reveals the steps of the active scenario one at a time, each after its
//! own delay, and supports play, pause, reset and scenario switching. The
//! state machine lives in [`domain::aggregates::PlaybackSession`]; the timer
//! loop that drives it lives in [`application::controller`].

pub mod application;
pub mod domain;
pub mod infrastructure;
