//! Shared test doubles for the Sagaflow workspace.

mod clock;
mod journal;

pub use clock::FixedClock;
pub use journal::{FailingEventJournal, RecordingEventJournal};
