//! Aggregate root for the playback context.

use std::collections::BTreeSet;

use sagaflow_core::aggregate::AggregateRoot;
use sagaflow_core::clock::Clock;
use sagaflow_core::error::FlowError;
use sagaflow_core::event::EventMetadata;
use sagaflow_scenarios::domain::scenario::ScenarioKey;
use sagaflow_scenarios::domain::step::Step;
use uuid::Uuid;

use super::events::{
    PlaybackEvent, PlaybackEventKind, PlaybackFinished, PlaybackPaused, PlaybackReset,
    PlaybackStarted, ScenarioSelected, StepCompleted,
};

/// Identifies one outstanding step wait.
///
/// The epoch advances whenever a wait is cancelled, so a ticket issued before
/// a pause, reset or scenario switch never matches again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceTicket {
    epoch: u64,
    index: usize,
}

/// The step currently being awaited.
#[derive(Debug, Clone, Copy)]
pub struct PendingStep {
    /// Ticket to present back to [`PlaybackSession::complete_step`].
    pub ticket: AdvanceTicket,
    /// The step in progress.
    pub step: &'static Step,
}

/// The aggregate root for one playback session.
///
/// Invariants:
/// - `current_index <= steps.len()`, and it only grows while playing.
/// - `completed` holds exactly the ids of `steps[..current_index]`.
/// - `is_playing` is false once `current_index == steps.len()`.
#[derive(Debug)]
pub struct PlaybackSession {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    /// Active scenario.
    pub(crate) scenario: ScenarioKey,
    /// Index of the next step to reveal.
    pub(crate) current_index: usize,
    /// Whether a step wait is (or should be) outstanding.
    pub(crate) is_playing: bool,
    /// Ids of revealed steps.
    pub(crate) completed: BTreeSet<u32>,
    epoch: u64,
    /// Correlation of the command that started the current run.
    run_correlation_id: Uuid,
    /// Uncommitted events pending journaling.
    uncommitted_events: Vec<PlaybackEvent>,
}

impl PlaybackSession {
    /// Creates an idle session on the `success` scenario.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            scenario: ScenarioKey::default(),
            current_index: 0,
            is_playing: false,
            completed: BTreeSet::new(),
            epoch: 0,
            run_correlation_id: Uuid::nil(),
            uncommitted_events: Vec::new(),
        }
    }

    /// The active scenario.
    #[must_use]
    pub const fn scenario(&self) -> ScenarioKey {
        self.scenario
    }

    /// Steps of the active scenario.
    #[must_use]
    pub const fn steps(&self) -> &'static [Step] {
        self.scenario.steps()
    }

    /// Index of the next step to reveal; equals `steps().len()` when finished.
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    /// Whether playback is running.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Whether every step has been revealed.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.current_index >= self.steps().len()
    }

    /// Ids of revealed steps.
    #[must_use]
    pub const fn completed(&self) -> &BTreeSet<u32> {
        &self.completed
    }

    /// The step at `current_index`, if any.
    #[must_use]
    pub fn current_step(&self) -> Option<&'static Step> {
        self.steps().get(self.current_index)
    }

    /// The wait that should be outstanding right now, if any.
    #[must_use]
    pub fn pending_step(&self) -> Option<PendingStep> {
        if !self.is_playing {
            return None;
        }
        self.current_step().map(|step| PendingStep {
            ticket: self.ticket(),
            step,
        })
    }

    const fn ticket(&self) -> AdvanceTicket {
        AdvanceTicket {
            epoch: self.epoch,
            index: self.current_index,
        }
    }

    /// Starts or resumes playback.
    ///
    /// A finished session is reset first. Calling this while already playing
    /// records nothing, so the outstanding wait is left alone.
    pub fn play(&mut self, correlation_id: Uuid, clock: &dyn Clock) {
        if self.is_playing {
            return;
        }
        if self.is_finished() {
            self.record_reset(correlation_id, clock);
        }
        let kind = PlaybackEventKind::PlaybackStarted(PlaybackStarted {
            scenario: self.scenario,
            from_index: self.current_index,
        });
        self.record(kind, correlation_id, clock);
    }

    /// Pauses playback. The in-flight step is not completed; resuming waits
    /// its full delay again.
    pub fn pause(&mut self, correlation_id: Uuid, clock: &dyn Clock) {
        if !self.is_playing {
            return;
        }
        let kind = PlaybackEventKind::PlaybackPaused(PlaybackPaused {
            scenario: self.scenario,
            at_index: self.current_index,
        });
        self.record(kind, correlation_id, clock);
    }

    /// Rewinds to the first step, clears completions and stops.
    pub fn reset(&mut self, correlation_id: Uuid, clock: &dyn Clock) {
        self.record_reset(correlation_id, clock);
    }

    /// Pauses when playing, otherwise behaves as [`Self::play`].
    pub fn toggle(&mut self, correlation_id: Uuid, clock: &dyn Clock) {
        if self.is_playing {
            self.pause(correlation_id, clock);
        } else {
            self.play(correlation_id, clock);
        }
    }

    /// Replaces the active scenario and resets.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::InvalidScenario` if `name` is not a known key; the
    /// session is left untouched.
    pub fn select_scenario(
        &mut self,
        name: &str,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), FlowError> {
        let scenario: ScenarioKey = name.parse()?;
        let kind = PlaybackEventKind::ScenarioSelected(ScenarioSelected {
            previous: self.scenario,
            scenario,
        });
        self.record(kind, correlation_id, clock);
        Ok(())
    }

    /// Marks the awaited step completed once its delay has elapsed.
    ///
    /// Returns `false` without recording anything when `ticket` is stale,
    /// i.e. the wait was cancelled after it was issued.
    pub fn complete_step(&mut self, ticket: AdvanceTicket, clock: &dyn Clock) -> bool {
        if !self.is_playing || ticket != self.ticket() {
            return false;
        }
        let Some(step) = self.current_step() else {
            return false;
        };

        let correlation_id = self.run_correlation_id;
        let kind = PlaybackEventKind::StepCompleted(StepCompleted {
            scenario: self.scenario,
            step_id: step.id,
            index: self.current_index,
        });
        self.record(kind, correlation_id, clock);

        if self.is_finished() {
            let kind = PlaybackEventKind::PlaybackFinished(PlaybackFinished {
                scenario: self.scenario,
                completed_steps: self.completed.len(),
            });
            self.record(kind, correlation_id, clock);
        }
        true
    }

    fn record_reset(&mut self, correlation_id: Uuid, clock: &dyn Clock) {
        let kind = PlaybackEventKind::PlaybackReset(PlaybackReset {
            scenario: self.scenario,
        });
        self.record(kind, correlation_id, clock);
    }

    /// Wraps `kind` in an envelope, applies it and queues it for journaling.
    fn record(&mut self, kind: PlaybackEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        // TODO: event_id uses Uuid::new_v4(); inject an id generator so
        // journaled sessions can be compared byte-for-byte in tests.
        let event = PlaybackEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                aggregate_id: self.id,
                sequence_number: self.version + 1,
                correlation_id,
                occurred_at: clock.now(),
            },
            kind,
        };
        self.apply(&event);
        self.uncommitted_events.push(event);
    }

    fn rewind(&mut self) {
        self.current_index = 0;
        self.completed.clear();
        self.is_playing = false;
        self.epoch += 1;
    }
}

impl AggregateRoot for PlaybackSession {
    type Event = PlaybackEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            PlaybackEventKind::PlaybackStarted(_) => {
                self.is_playing = true;
                self.epoch += 1;
                self.run_correlation_id = event.metadata.correlation_id;
            }
            PlaybackEventKind::PlaybackPaused(_) => {
                self.is_playing = false;
                self.epoch += 1;
            }
            PlaybackEventKind::PlaybackReset(_) => self.rewind(),
            PlaybackEventKind::ScenarioSelected(payload) => {
                self.scenario = payload.scenario;
                self.rewind();
            }
            PlaybackEventKind::StepCompleted(payload) => {
                self.completed.insert(payload.step_id);
                self.current_index = payload.index + 1;
            }
            PlaybackEventKind::PlaybackFinished(_) => {
                self.is_playing = false;
            }
        }
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn take_uncommitted_events(&mut self) -> Vec<Self::Event> {
        std::mem::take(&mut self.uncommitted_events)
    }
}
