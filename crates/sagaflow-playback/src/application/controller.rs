//! The playback controller: a single driver task that owns a
//! [`PlaybackSession`] and advances it on a timer.
//!
//! Callers hold a cloneable [`PlaybackController`] handle. Operations travel
//! to the driver over an `mpsc` queue and are answered over `oneshot`; the
//! observable [`PlaybackView`] is published on a `watch` channel.
//!
//! The driver has exactly one suspension point besides its inbox: the
//! deadline of the step in progress. Commands and the deadline are raced in a
//! biased `select!`, and a deadline only completes its step if its
//! [`AdvanceTicket`](crate::domain::aggregates::AdvanceTicket) is still
//! current. A pause, reset or scenario switch therefore cancels the wait
//! before its reply is sent, even if the deadline has already passed.

use std::sync::Arc;

use sagaflow_core::aggregate::AggregateRoot;
use sagaflow_core::clock::Clock;
use sagaflow_core::command::Command;
use sagaflow_core::error::FlowError;
use sagaflow_core::event::DomainEvent;
use sagaflow_core::journal::{EventJournal, StoredEvent};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::config::PlaybackConfig;
use super::query_handlers::{PlaybackView, playback_view};
use crate::domain::aggregates::{AdvanceTicket, PlaybackSession};
use crate::domain::commands::{
    PausePlayback, PlaybackCommand, ResetPlayback, SelectScenario, StartPlayback, TogglePlayback,
};

type Reply = oneshot::Sender<Result<PlaybackView, FlowError>>;

#[derive(Debug)]
enum DriverMessage {
    Command { command: PlaybackCommand, reply: Reply },
    Shutdown { done: oneshot::Sender<()> },
}

/// Handle to a running playback driver.
///
/// Cloning is cheap; the driver stops once every handle has been dropped or
/// [`shutdown`](Self::shutdown) is called.
#[derive(Debug, Clone)]
pub struct PlaybackController {
    session_id: Uuid,
    inbox: mpsc::Sender<DriverMessage>,
    views: watch::Receiver<PlaybackView>,
}

impl PlaybackController {
    /// Spawns the driver task on the current Tokio runtime.
    ///
    /// The new session is idle on the `success` scenario.
    #[must_use]
    pub fn spawn(
        config: PlaybackConfig,
        clock: Arc<dyn Clock>,
        journal: Arc<dyn EventJournal>,
    ) -> Self {
        let session = PlaybackSession::new(Uuid::new_v4());
        let session_id = session.id;
        let journaled_version = session.version();
        let (views_tx, views) = watch::channel(playback_view(&session));
        let (inbox, messages) = mpsc::channel(config.command_buffer());

        let driver = PlaybackDriver {
            session,
            config,
            clock,
            journal,
            views: views_tx,
            messages,
            armed: None,
            unjournaled: Vec::new(),
            journaled_version,
        };
        tokio::spawn(driver.run());

        Self {
            session_id,
            inbox,
            views,
        }
    }

    /// The session this controller drives.
    #[must_use]
    pub const fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Whether the driver task is still accepting commands.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.inbox.is_closed()
    }

    /// The most recently published view.
    #[must_use]
    pub fn view(&self) -> PlaybackView {
        self.views.borrow().clone()
    }

    /// A receiver notified after every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PlaybackView> {
        self.views.clone()
    }

    /// Sends `command` to the driver and waits for the resulting view.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::InvalidScenario` for an unknown scenario name and
    /// `FlowError::ControllerStopped` if the driver has exited.
    pub async fn execute(&self, command: PlaybackCommand) -> Result<PlaybackView, FlowError> {
        let (reply, response) = oneshot::channel();
        self.inbox
            .send(DriverMessage::Command { command, reply })
            .await
            .map_err(|_| FlowError::ControllerStopped)?;
        response.await.map_err(|_| FlowError::ControllerStopped)?
    }

    /// Starts or resumes playback; restarts from the first step when finished.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::ControllerStopped` if the driver has exited.
    pub async fn play(&self) -> Result<PlaybackView, FlowError> {
        self.execute(PlaybackCommand::Start(StartPlayback {
            correlation_id: Uuid::new_v4(),
        }))
        .await
    }

    /// Pauses playback, abandoning the in-flight step's wait.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::ControllerStopped` if the driver has exited.
    pub async fn pause(&self) -> Result<PlaybackView, FlowError> {
        self.execute(PlaybackCommand::Pause(PausePlayback {
            correlation_id: Uuid::new_v4(),
        }))
        .await
    }

    /// Rewinds to the first step and stops.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::ControllerStopped` if the driver has exited.
    pub async fn reset(&self) -> Result<PlaybackView, FlowError> {
        self.execute(PlaybackCommand::Reset(ResetPlayback {
            correlation_id: Uuid::new_v4(),
        }))
        .await
    }

    /// Pauses when playing, plays otherwise.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::ControllerStopped` if the driver has exited.
    pub async fn toggle(&self) -> Result<PlaybackView, FlowError> {
        self.execute(PlaybackCommand::Toggle(TogglePlayback {
            correlation_id: Uuid::new_v4(),
        }))
        .await
    }

    /// Switches to the scenario named `name` and resets.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::InvalidScenario` if `name` is unknown, leaving the
    /// session unchanged, or `FlowError::ControllerStopped` if the driver
    /// has exited.
    pub async fn select_scenario(&self, name: &str) -> Result<PlaybackView, FlowError> {
        self.execute(PlaybackCommand::SelectScenario(SelectScenario {
            correlation_id: Uuid::new_v4(),
            scenario: name.to_owned(),
        }))
        .await
    }

    /// Stops the driver. Later operations fail with `ControllerStopped`.
    pub async fn shutdown(&self) {
        let (done, stopped) = oneshot::channel();
        if self
            .inbox
            .send(DriverMessage::Shutdown { done })
            .await
            .is_ok()
        {
            // An error only means the driver is already gone.
            let _ = stopped.await;
        }
    }
}

/// A step wait that is currently armed.
#[derive(Debug, Clone, Copy)]
struct ArmedStep {
    ticket: AdvanceTicket,
    step_id: u32,
    deadline: Instant,
}

struct PlaybackDriver {
    session: PlaybackSession,
    config: PlaybackConfig,
    clock: Arc<dyn Clock>,
    journal: Arc<dyn EventJournal>,
    views: watch::Sender<PlaybackView>,
    messages: mpsc::Receiver<DriverMessage>,
    armed: Option<ArmedStep>,
    /// Events the journal has not accepted yet, oldest first.
    unjournaled: Vec<StoredEvent>,
    /// Session version the journal holds.
    journaled_version: i64,
}

impl PlaybackDriver {
    async fn run(mut self) {
        info!(session_id = %self.session.id, "playback driver started");
        loop {
            self.rearm();
            let deadline = self.armed.map(|armed| armed.deadline);

            tokio::select! {
                biased;
                message = self.messages.recv() => match message {
                    Some(DriverMessage::Command { command, reply }) => {
                        let result = self.dispatch(command).await;
                        // The caller may have stopped waiting.
                        let _ = reply.send(result);
                    }
                    Some(DriverMessage::Shutdown { done }) => {
                        self.messages.close();
                        let _ = done.send(());
                        break;
                    }
                    None => break,
                },
                () = wait_until(deadline) => self.fire().await,
            }
        }
        info!(session_id = %self.session.id, "playback driver stopped");
    }

    /// Keeps the armed wait in step with the session: an unchanged ticket
    /// keeps its deadline, a new ticket gets the step's full delay.
    fn rearm(&mut self) {
        let Some(pending) = self.session.pending_step() else {
            self.armed = None;
            return;
        };
        if self
            .armed
            .is_some_and(|armed| armed.ticket == pending.ticket)
        {
            return;
        }
        let delay = self.config.scaled(pending.step.delay());
        debug!(
            session_id = %self.session.id,
            step_id = pending.step.id,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "awaiting step"
        );
        self.armed = Some(ArmedStep {
            ticket: pending.ticket,
            step_id: pending.step.id,
            deadline: Instant::now() + delay,
        });
    }

    async fn fire(&mut self) {
        let Some(armed) = self.armed.take() else {
            return;
        };
        if !self.session.complete_step(armed.ticket, self.clock.as_ref()) {
            debug!(step_id = armed.step_id, "discarding stale step wait");
            return;
        }
        debug!(
            session_id = %self.session.id,
            step_id = armed.step_id,
            scenario = %self.session.scenario(),
            "step completed"
        );
        if self.session.is_finished() {
            info!(
                session_id = %self.session.id,
                scenario = %self.session.scenario(),
                "playback finished"
            );
        }
        self.commit().await;
    }

    #[instrument(
        skip(self, command),
        fields(
            session_id = %self.session.id,
            command_type = command.command_type(),
            correlation_id = %command.correlation_id(),
        )
    )]
    async fn dispatch(&mut self, command: PlaybackCommand) -> Result<PlaybackView, FlowError> {
        info!("handling playback command");
        let clock = self.clock.as_ref();
        match &command {
            PlaybackCommand::Start(c) => self.session.play(c.correlation_id, clock),
            PlaybackCommand::Pause(c) => self.session.pause(c.correlation_id, clock),
            PlaybackCommand::Reset(c) => self.session.reset(c.correlation_id, clock),
            PlaybackCommand::Toggle(c) => self.session.toggle(c.correlation_id, clock),
            PlaybackCommand::SelectScenario(c) => {
                if let Err(error) = self
                    .session
                    .select_scenario(&c.scenario, c.correlation_id, clock)
                {
                    warn!(%error, "rejected scenario selection");
                    return Err(error);
                }
                info!(scenario = %self.session.scenario(), "scenario selected");
            }
        }
        self.commit().await;
        Ok(playback_view(&self.session))
    }

    /// Journals uncommitted events and publishes the view if it changed.
    ///
    /// A rejected batch stays buffered and is retried, in front of newer
    /// events, on the next commit.
    async fn commit(&mut self) {
        self.unjournaled.extend(
            self.session
                .take_uncommitted_events()
                .iter()
                .map(DomainEvent::to_stored),
        );
        if !self.unjournaled.is_empty() {
            match self
                .journal
                .append_events(self.session.id, self.journaled_version, &self.unjournaled)
                .await
            {
                Ok(()) => {
                    if let Some(last) = self.unjournaled.last() {
                        self.journaled_version = last.sequence_number;
                    }
                    self.unjournaled.clear();
                }
                Err(error) => warn!(
                    %error,
                    session_id = %self.session.id,
                    pending = self.unjournaled.len(),
                    "failed to journal playback events"
                ),
            }
        }

        let view = playback_view(&self.session);
        self.views.send_if_modified(|current| {
            if *current == view {
                false
            } else {
                *current = view;
                true
            }
        });
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use sagaflow_core::error::FlowError;
    use sagaflow_core::journal::{EventJournal, StoredEvent};
    use sagaflow_scenarios::domain::scenario::ScenarioKey;
    use sagaflow_test_support::{FailingEventJournal, FixedClock, RecordingEventJournal};
    use tokio::time::sleep;
    use uuid::Uuid;

    use super::PlaybackController;
    use crate::application::config::PlaybackConfig;
    use crate::application::query_handlers::{PlaybackAction, PlaybackView};
    use crate::infrastructure::in_memory_journal::InMemoryEventJournal;

    /// Rejects its first append, then behaves as the in-memory journal.
    #[derive(Debug, Default)]
    struct FlakyJournal {
        inner: InMemoryEventJournal,
        failed_once: AtomicBool,
    }

    #[async_trait]
    impl EventJournal for FlakyJournal {
        async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, FlowError> {
            self.inner.load_events(aggregate_id).await
        }

        async fn append_events(
            &self,
            aggregate_id: Uuid,
            expected_version: i64,
            events: &[StoredEvent],
        ) -> Result<(), FlowError> {
            if !self.failed_once.swap(true, Ordering::SeqCst) {
                return Err(FlowError::Infrastructure("journal unavailable".into()));
            }
            self.inner
                .append_events(aggregate_id, expected_version, events)
                .await
        }
    }

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        ))
    }

    fn spawn_with(config: PlaybackConfig) -> (PlaybackController, Arc<RecordingEventJournal>) {
        let journal = Arc::new(RecordingEventJournal::default());
        let controller = PlaybackController::spawn(config, clock(), journal.clone());
        (controller, journal)
    }

    fn spawn() -> (PlaybackController, Arc<RecordingEventJournal>) {
        spawn_with(PlaybackConfig::default())
    }

    async fn run_to_finish(controller: &PlaybackController) -> PlaybackView {
        let mut updates = controller.subscribe();
        let finished = updates.wait_for(|view| view.is_finished).await.unwrap();
        finished.clone()
    }

    fn completed_step_ids(journal: &RecordingEventJournal) -> Vec<u64> {
        journal
            .events()
            .iter()
            .filter(|event| event.event_type == "playback.step_completed")
            .map(|event| event.payload["StepCompleted"]["step_id"].as_u64().unwrap())
            .collect()
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_view_is_idle_on_success() {
        let (controller, _journal) = spawn();

        let view = controller.view();

        assert_eq!(view.session_id, controller.session_id());
        assert_eq!(view.scenario, ScenarioKey::Success);
        assert_eq!(view.current_index, 0);
        assert!(!view.is_playing);
        assert!(view.completed.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_runs_every_scenario_to_completion_in_order() {
        for key in ScenarioKey::ALL {
            // Arrange
            let (controller, journal) = spawn();
            controller.select_scenario(key.as_str()).await.unwrap();

            // Act
            controller.play().await.unwrap();
            let finished = run_to_finish(&controller).await;

            // Assert
            let ids: Vec<u32> = key.steps().iter().map(|step| step.id).collect();
            assert_eq!(finished.completed, ids);
            assert_eq!(finished.current_index, ids.len());
            assert!(!finished.is_playing);
            assert_eq!(finished.next_action, PlaybackAction::Replay);

            let journaled: Vec<u64> = ids.iter().map(|id| u64::from(*id)).collect();
            assert_eq!(completed_step_ids(&journal), journaled);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_steps_complete_after_their_own_delay() {
        // Arrange
        let (controller, _journal) = spawn();

        // Act
        controller.play().await.unwrap();
        sleep(ms(499)).await;
        let before = controller.view();
        sleep(ms(2)).await;
        let after = controller.view();

        // Assert
        assert_eq!(before.current_index, 0);
        assert_eq!(after.current_index, 1);
        assert_eq!(after.completed, vec![1]);
        assert!(after.is_playing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_cancels_in_flight_step_and_resume_waits_full_delay() {
        // Arrange: step 1 completes at 500ms, step 2 (300ms) is in flight.
        let (controller, journal) = spawn();
        controller.play().await.unwrap();
        sleep(ms(650)).await;

        // Act
        let paused = controller.pause().await.unwrap();
        sleep(ms(1_000)).await;
        let still_paused = controller.view();
        controller.play().await.unwrap();
        sleep(ms(290)).await;
        let mid_delay = controller.view();
        sleep(ms(20)).await;
        let resumed = controller.view();

        // Assert
        assert_eq!(paused.current_index, 1);
        assert!(!paused.is_playing);
        assert_eq!(still_paused.completed, vec![1]);
        assert_eq!(mid_delay.current_index, 1);
        assert_eq!(resumed.current_index, 2);
        assert_eq!(resumed.completed, vec![1, 2]);
        assert_eq!(completed_step_ids(&journal), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_redundant_play_does_not_restart_delay() {
        // Arrange
        let (controller, _journal) = spawn();
        controller.play().await.unwrap();
        sleep(ms(400)).await;

        // Act
        controller.play().await.unwrap();
        sleep(ms(150)).await;

        // Assert
        assert_eq!(controller.view().completed, vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_pending_wait() {
        // Arrange
        let (controller, journal) = spawn();
        controller.play().await.unwrap();
        sleep(ms(900)).await;

        // Act
        let reset = controller.reset().await.unwrap();
        sleep(ms(5_000)).await;

        // Assert
        assert_eq!(reset.current_index, 0);
        assert!(reset.completed.is_empty());
        assert!(!reset.is_playing);
        assert_eq!(controller.view(), reset);
        assert_eq!(completed_step_ids(&journal), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_from_paused_and_finished_rewinds() {
        // Arrange
        let (controller, _journal) = spawn();
        controller.play().await.unwrap();
        sleep(ms(900)).await;
        controller.pause().await.unwrap();

        // Act
        let from_paused = controller.reset().await.unwrap();
        controller.play().await.unwrap();
        run_to_finish(&controller).await;
        let from_finished = controller.reset().await.unwrap();
        sleep(ms(5_000)).await;

        // Assert
        for view in [&from_paused, &from_finished] {
            assert_eq!(view.current_index, 0);
            assert!(view.completed.is_empty());
            assert!(!view.is_playing);
            assert_eq!(view.next_action, PlaybackAction::Play);
        }
        assert_eq!(controller.view(), from_finished);
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_scenario_while_playing_stops_and_switches() {
        // Arrange
        let (controller, _journal) = spawn();
        controller.play().await.unwrap();
        sleep(ms(600)).await;

        // Act
        let view = controller.select_scenario("shipmentFailure").await.unwrap();
        sleep(ms(5_000)).await;

        // Assert
        assert_eq!(view.scenario, ScenarioKey::ShipmentFailure);
        assert_eq!(view.total_steps, 20);
        assert_eq!(view.current_index, 0);
        assert!(view.completed.is_empty());
        assert!(!view.is_playing);
        assert_eq!(controller.view(), view);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_scenario_is_rejected_without_side_effects() {
        // Arrange
        let (controller, journal) = spawn();
        controller.play().await.unwrap();
        sleep(ms(600)).await;
        let before = controller.view();
        let journaled = journal.events().len();

        // Act
        let result = controller.select_scenario("refundFailure").await;

        // Assert
        match result.unwrap_err() {
            FlowError::InvalidScenario(name) => assert_eq!(name, "refundFailure"),
            other => panic!("expected InvalidScenario, got {other:?}"),
        }
        assert_eq!(controller.view(), before);
        assert_eq!(journal.events().len(), journaled);

        // Playback keeps going on the original scenario.
        sleep(ms(300)).await;
        assert_eq!(controller.view().completed, vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_after_finish_replays_from_start() {
        // Arrange
        let (controller, _journal) = spawn();
        controller.select_scenario("paymentFailure").await.unwrap();
        controller.play().await.unwrap();
        run_to_finish(&controller).await;

        // Act
        let replay = controller.play().await.unwrap();

        // Assert
        assert_eq!(replay.scenario, ScenarioKey::PaymentFailure);
        assert_eq!(replay.current_index, 0);
        assert!(replay.completed.is_empty());
        assert!(replay.is_playing);

        let finished = run_to_finish(&controller).await;
        assert_eq!(finished.completed, (1..=13).collect::<Vec<u32>>());
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_pauses_a_running_playback() {
        let (controller, _journal) = spawn();

        let playing = controller.toggle().await.unwrap();
        let paused = controller.toggle().await.unwrap();

        assert!(playing.is_playing);
        assert!(!paused.is_playing);
        assert_eq!(paused.next_action, PlaybackAction::Play);
    }

    #[tokio::test(start_paused = true)]
    async fn test_time_scale_shortens_each_wait() {
        // Arrange
        let config = PlaybackConfig::default().with_time_scale(0.5).unwrap();
        let (controller, _journal) = spawn_with(config);

        // Act
        controller.play().await.unwrap();
        sleep(ms(260)).await;

        // Assert
        assert_eq!(controller.view().completed, vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_journal_receives_contiguous_sequence_numbers() {
        // Arrange
        let (controller, journal) = spawn();

        // Act
        controller.play().await.unwrap();
        sleep(ms(1_000)).await;
        controller.pause().await.unwrap();

        // Assert
        let sequence: Vec<i64> = journal
            .events()
            .iter()
            .map(|event| event.sequence_number)
            .collect();
        assert_eq!(sequence, vec![1, 2, 3, 4]);
        let types: Vec<String> = journal
            .events()
            .into_iter()
            .map(|event| event.event_type)
            .collect();
        assert_eq!(
            types,
            vec![
                "playback.started",
                "playback.step_completed",
                "playback.step_completed",
                "playback.paused",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_journal_failure_does_not_block_playback() {
        // Arrange
        let controller = PlaybackController::spawn(
            PlaybackConfig::default(),
            clock(),
            Arc::new(FailingEventJournal),
        );

        // Act
        controller.play().await.unwrap();
        sleep(ms(501)).await;

        // Assert
        assert_eq!(controller.view().completed, vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_append_is_retried_with_later_events() {
        // Arrange
        let journal = Arc::new(FlakyJournal::default());
        let controller =
            PlaybackController::spawn(PlaybackConfig::default(), clock(), journal.clone());

        // Act: the start event is rejected, step completions follow.
        controller.play().await.unwrap();
        sleep(ms(2_000)).await;
        let paused = controller.pause().await.unwrap();

        // Assert
        let events = journal.load_events(controller.session_id()).await.unwrap();
        let sequence: Vec<i64> = events.iter().map(|event| event.sequence_number).collect();
        let expected: Vec<i64> = (1..=paused.version).collect();
        assert_eq!(sequence, expected);
        assert_eq!(paused.completed, vec![1, 2, 3, 4]);
        assert_eq!(events[0].event_type, "playback.started");
        assert_eq!(events.last().unwrap().event_type, "playback.paused");
    }

    #[tokio::test(start_paused = true)]
    async fn test_operations_fail_after_shutdown() {
        // Arrange
        let (controller, _journal) = spawn();
        assert!(controller.is_running());

        // Act
        controller.shutdown().await;
        let result = controller.play().await;

        // Assert
        assert!(!controller.is_running());
        assert!(matches!(result, Err(FlowError::ControllerStopped)));
    }
}
