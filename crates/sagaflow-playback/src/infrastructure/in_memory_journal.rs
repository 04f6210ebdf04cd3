//! Process-local event journal.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use sagaflow_core::error::FlowError;
use sagaflow_core::journal::{EventJournal, StoredEvent};
use uuid::Uuid;

/// Keeps every aggregate stream in memory; nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryEventJournal {
    streams: RwLock<HashMap<Uuid, Vec<StoredEvent>>>,
}

impl InMemoryEventJournal {
    /// Creates an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> FlowError {
    FlowError::Infrastructure("event journal lock poisoned".to_owned())
}

#[async_trait]
impl EventJournal for InMemoryEventJournal {
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, FlowError> {
        let streams = self.streams.read().map_err(poisoned)?;
        Ok(streams.get(&aggregate_id).cloned().unwrap_or_default())
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), FlowError> {
        let mut streams = self.streams.write().map_err(poisoned)?;
        let stream = streams.entry(aggregate_id).or_default();
        let actual = i64::try_from(stream.len())
            .map_err(|e| FlowError::Infrastructure(format!("stream too long: {e}")))?;
        if actual != expected_version {
            return Err(FlowError::ConcurrencyConflict {
                aggregate_id,
                expected: expected_version,
                actual,
            });
        }
        stream.extend_from_slice(events);
        Ok(())
    }
}
