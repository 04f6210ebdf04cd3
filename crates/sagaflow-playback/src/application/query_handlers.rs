//! Query handlers for the playback context.
//!
//! [`PlaybackView`] is the observable state a presentation layer renders
//! from; the controller republishes it after every change.

use sagaflow_core::aggregate::AggregateRoot;
use sagaflow_core::error::FlowError;
use sagaflow_core::journal::{EventJournal, StoredEvent};
use sagaflow_scenarios::domain::scenario::ScenarioKey;
use sagaflow_scenarios::domain::step::Step;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::PlaybackSession;

/// What the single play/pause control should offer next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackAction {
    /// Idle or paused with steps remaining.
    Play,
    /// Currently playing.
    Pause,
    /// Finished; playing again starts over.
    Replay,
}

/// Read-only view of a playback session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaybackView {
    /// The session identifier.
    pub session_id: Uuid,
    /// The active scenario.
    pub scenario: ScenarioKey,
    /// Index of the next step to reveal.
    pub current_index: usize,
    /// Number of steps in the active scenario.
    pub total_steps: usize,
    /// Whether playback is running.
    pub is_playing: bool,
    /// Whether every step has been revealed.
    pub is_finished: bool,
    /// Ids of revealed steps, ascending.
    pub completed: Vec<u32>,
    /// The step in progress or next to play.
    pub current_step: Option<Step>,
    /// 1-based step counter, capped at `total_steps`.
    pub step_number: usize,
    /// Action the play/pause control offers.
    pub next_action: PlaybackAction,
    /// Current version (event count).
    pub version: i64,
}

/// Builds the view of `session`.
#[must_use]
pub fn playback_view(session: &PlaybackSession) -> PlaybackView {
    let total_steps = session.steps().len();
    let next_action = if session.is_playing() {
        PlaybackAction::Pause
    } else if session.is_finished() {
        PlaybackAction::Replay
    } else {
        PlaybackAction::Play
    };

    PlaybackView {
        session_id: session.id,
        scenario: session.scenario(),
        current_index: session.current_index(),
        total_steps,
        is_playing: session.is_playing(),
        is_finished: session.is_finished(),
        completed: session.completed().iter().copied().collect(),
        current_step: session.current_step().copied(),
        step_number: (session.current_index() + 1).min(total_steps),
        next_action,
        version: session.version(),
    }
}

/// Retrieves the journaled events of a session, oldest first. A session
/// that has not recorded anything yet yields an empty list.
///
/// # Errors
///
/// Returns `FlowError::Infrastructure` if the journal cannot be read.
pub async fn get_playback_events(
    session_id: Uuid,
    journal: &dyn EventJournal,
) -> Result<Vec<StoredEvent>, FlowError> {
    journal.load_events(session_id).await
}
