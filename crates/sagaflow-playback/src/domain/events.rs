//! Domain events for the playback context.

use sagaflow_core::event::{DomainEvent, EventMetadata};
use sagaflow_scenarios::domain::scenario::ScenarioKey;
use serde::{Deserialize, Serialize};

/// Emitted when playback begins or resumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackStarted {
    /// The active scenario.
    pub scenario: ScenarioKey,
    /// Index of the step that will be awaited first.
    pub from_index: usize,
}

/// Emitted when playback is paused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackPaused {
    /// The active scenario.
    pub scenario: ScenarioKey,
    /// Index of the step whose wait was abandoned.
    pub at_index: usize,
}

/// Emitted when playback is rewound to the first step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackReset {
    /// The active scenario.
    pub scenario: ScenarioKey,
}

/// Emitted when the active scenario is replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSelected {
    /// The scenario that was active before.
    pub previous: ScenarioKey,
    /// The newly active scenario.
    pub scenario: ScenarioKey,
}

/// Emitted when a step's delay elapses uncancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepCompleted {
    /// The active scenario.
    pub scenario: ScenarioKey,
    /// The completed step's id.
    pub step_id: u32,
    /// The completed step's index.
    pub index: usize,
}

/// Emitted after the final step completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackFinished {
    /// The active scenario.
    pub scenario: ScenarioKey,
    /// Number of steps revealed.
    pub completed_steps: usize,
}

/// Event type identifier for [`PlaybackStarted`].
pub const PLAYBACK_STARTED_EVENT_TYPE: &str = "playback.started";

/// Event type identifier for [`PlaybackPaused`].
pub const PLAYBACK_PAUSED_EVENT_TYPE: &str = "playback.paused";

/// Event type identifier for [`PlaybackReset`].
pub const PLAYBACK_RESET_EVENT_TYPE: &str = "playback.reset";

/// Event type identifier for [`ScenarioSelected`].
pub const SCENARIO_SELECTED_EVENT_TYPE: &str = "playback.scenario_selected";

/// Event type identifier for [`StepCompleted`].
pub const STEP_COMPLETED_EVENT_TYPE: &str = "playback.step_completed";

/// Event type identifier for [`PlaybackFinished`].
pub const PLAYBACK_FINISHED_EVENT_TYPE: &str = "playback.finished";

/// Event payload variants for the playback context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackEventKind {
    /// Playback started.
    PlaybackStarted(PlaybackStarted),
    /// Playback paused.
    PlaybackPaused(PlaybackPaused),
    /// Playback rewound.
    PlaybackReset(PlaybackReset),
    /// Scenario switched.
    ScenarioSelected(ScenarioSelected),
    /// A step was revealed.
    StepCompleted(StepCompleted),
    /// The last step was revealed.
    PlaybackFinished(PlaybackFinished),
}

impl PlaybackEventKind {
    /// Event type name for this payload.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::PlaybackStarted(_) => PLAYBACK_STARTED_EVENT_TYPE,
            Self::PlaybackPaused(_) => PLAYBACK_PAUSED_EVENT_TYPE,
            Self::PlaybackReset(_) => PLAYBACK_RESET_EVENT_TYPE,
            Self::ScenarioSelected(_) => SCENARIO_SELECTED_EVENT_TYPE,
            Self::StepCompleted(_) => STEP_COMPLETED_EVENT_TYPE,
            Self::PlaybackFinished(_) => PLAYBACK_FINISHED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the playback context.
#[derive(Debug, Clone)]
pub struct PlaybackEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: PlaybackEventKind,
}

impl DomainEvent for PlaybackEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Derived `Serialize` on plain data does not fail.
        serde_json::to_value(&self.kind).unwrap_or(serde_json::Value::Null)
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
