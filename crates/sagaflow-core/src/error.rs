//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level error type shared by every Sagaflow crate.
#[derive(Debug, Error)]
pub enum FlowError {
    /// A scenario name outside the known set.
    #[error("invalid scenario: {0}")]
    InvalidScenario(String),

    /// A participant identifier outside the known set.
    #[error("unknown participant: {0}")]
    UnknownParticipant(String),

    /// A configuration or input value failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Optimistic concurrency conflict while appending to the journal.
    #[error(
        "concurrency conflict on aggregate {aggregate_id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        /// The aggregate that had the conflict.
        aggregate_id: Uuid,
        /// The expected version.
        expected: i64,
        /// The actual version found.
        actual: i64,
    },

    /// The playback driver task is no longer running.
    #[error("playback controller is no longer running")]
    ControllerStopped,

    /// A journal or other infrastructure failure.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_scenario_message_names_the_input() {
        let err = FlowError::InvalidScenario("refundFailure".to_owned());

        assert_eq!(err.to_string(), "invalid scenario: refundFailure");
    }

    #[test]
    fn test_concurrency_conflict_message_includes_versions() {
        let aggregate_id = Uuid::nil();
        let err = FlowError::ConcurrencyConflict {
            aggregate_id,
            expected: 3,
            actual: 5,
        };

        assert_eq!(
            err.to_string(),
            format!(
                "concurrency conflict on aggregate {aggregate_id}: expected version 3, found 5"
            )
        );
    }
}
