//! Step records: one message exchange between two participants.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::participant::Participant;

/// What kind of message a step carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// An instruction to change state.
    Command,
    /// A fact that something happened.
    Event,
    /// A read request.
    Query,
    /// The answer to a query.
    Response,
}

/// Outcome tag used only for grouping, never for branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    /// Part of the happy path.
    Success,
    /// Part of a failure or compensation path.
    Failure,
    /// Shared by every outcome.
    Normal,
}

/// An immutable, compiled-in message exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Step {
    /// Positive identifier, unique within its scenario.
    pub id: u32,
    /// Sending participant.
    pub from: Participant,
    /// Receiving participant. Equal to `from` for self-applied events.
    pub to: Participant,
    /// Display label.
    pub message: &'static str,
    /// Message kind.
    pub kind: MessageKind,
    /// How long the step stays in progress before it completes.
    pub delay_ms: u64,
    /// Optional outcome tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl Step {
    /// Builds an unconditioned step.
    #[must_use]
    pub const fn new(
        id: u32,
        from: Participant,
        to: Participant,
        message: &'static str,
        kind: MessageKind,
        delay_ms: u64,
    ) -> Self {
        Self {
            id,
            from,
            to,
            message,
            kind,
            delay_ms,
            condition: None,
        }
    }

    /// Returns the step tagged with `condition`.
    #[must_use]
    pub const fn when(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// The in-progress delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// The condition, with an absent tag read as `Normal`.
    #[must_use]
    pub fn effective_condition(&self) -> Condition {
        self.condition.unwrap_or(Condition::Normal)
    }
}
