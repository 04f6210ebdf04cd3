//! Query handlers for the scenario catalogue.
//!
//! The catalogue is compiled in, so these are plain functions returning
//! read-only view DTOs.

use sagaflow_core::error::FlowError;
use serde::Serialize;

use crate::domain::participant::Participant;
use crate::domain::scenario::ScenarioKey;
use crate::domain::step::{Condition, Step};

/// Summary row for the scenario menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioSummary {
    /// Scenario key.
    pub key: ScenarioKey,
    /// Menu title.
    pub title: &'static str,
    /// Number of steps.
    pub step_count: usize,
    /// Sum of all step delays, in milliseconds.
    pub total_duration_ms: u64,
    /// Condition of the final step.
    pub outcome: Condition,
}

/// Full scenario with its ordered steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioView {
    /// Scenario key.
    pub key: ScenarioKey,
    /// Menu title.
    pub title: &'static str,
    /// Steps in playback order.
    pub steps: Vec<Step>,
}

/// Participant with its column position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantView {
    /// Stable identifier.
    pub id: &'static str,
    /// Display label.
    pub name: &'static str,
    /// Zero-based column.
    pub lane: usize,
}

fn summarize(key: ScenarioKey) -> ScenarioSummary {
    ScenarioSummary {
        key,
        title: key.title(),
        step_count: key.steps().len(),
        total_duration_ms: u64::try_from(key.total_duration().as_millis()).unwrap_or(u64::MAX),
        outcome: key.outcome(),
    }
}

/// Lists every scenario in menu order.
#[must_use]
pub fn list_scenarios() -> Vec<ScenarioSummary> {
    ScenarioKey::ALL.into_iter().map(summarize).collect()
}

/// Retrieves one scenario by its wire name.
///
/// # Errors
///
/// Returns `FlowError::InvalidScenario` if `name` is not a known key.
pub fn get_scenario(name: &str) -> Result<ScenarioView, FlowError> {
    let key: ScenarioKey = name.parse()?;
    Ok(ScenarioView {
        key,
        title: key.title(),
        steps: key.steps().to_vec(),
    })
}

/// Lists participants in lane order.
#[must_use]
pub fn list_participants() -> Vec<ParticipantView> {
    Participant::ALL
        .into_iter()
        .map(|participant| ParticipantView {
            id: participant.id(),
            name: participant.name(),
            lane: participant.lane(),
        })
        .collect()
}
