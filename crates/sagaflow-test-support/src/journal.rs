//! Test journals: `EventJournal` doubles.

use std::sync::Mutex;

use async_trait::async_trait;
use sagaflow_core::error::FlowError;
use sagaflow_core::journal::{EventJournal, StoredEvent};
use uuid::Uuid;

/// A journal that records every append and always accepts it, regardless of
/// the expected version. `load_events` returns what was appended for the
/// requested aggregate.
#[derive(Debug, Default)]
pub struct RecordingEventJournal {
    appended: Mutex<Vec<(Uuid, i64, Vec<StoredEvent>)>>,
}

impl RecordingEventJournal {
    /// Returns every appended event, in append order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn events(&self) -> Vec<StoredEvent> {
        self.appended
            .lock()
            .unwrap()
            .iter()
            .flat_map(|(_, _, events)| events.iter().cloned())
            .collect()
    }
}

#[async_trait]
impl EventJournal for RecordingEventJournal {
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, FlowError> {
        Ok(self
            .events()
            .into_iter()
            .filter(|event| event.aggregate_id == aggregate_id)
            .collect())
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), FlowError> {
        self.appended
            .lock()
            .unwrap()
            .push((aggregate_id, expected_version, events.to_vec()));
        Ok(())
    }
}

/// A journal that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingEventJournal;

#[async_trait]
impl EventJournal for FailingEventJournal {
    async fn load_events(&self, _aggregate_id: Uuid) -> Result<Vec<StoredEvent>, FlowError> {
        Err(FlowError::Infrastructure("journal unavailable".into()))
    }

    async fn append_events(
        &self,
        _aggregate_id: Uuid,
        _expected_version: i64,
        _events: &[StoredEvent],
    ) -> Result<(), FlowError> {
        Err(FlowError::Infrastructure("journal unavailable".into()))
    }
}
