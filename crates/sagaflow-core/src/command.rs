//! Command abstractions.

use uuid::Uuid;

/// An instruction sent to an aggregate by a caller.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Dotted type name used in logs, e.g. `playback.pause`.
    fn command_type(&self) -> &'static str;

    /// Correlation ID carried onto every event the command causes.
    fn correlation_id(&self) -> Uuid;
}
