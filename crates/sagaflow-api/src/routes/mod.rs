//! Route modules.

pub mod health;
pub mod participants;
pub mod playback;
pub mod scenarios;

#[cfg(test)]
pub(crate) fn test_state() -> crate::state::AppState {
    use std::sync::Arc;

    use sagaflow_core::clock::SystemClock;
    use sagaflow_playback::application::config::PlaybackConfig;
    use sagaflow_playback::application::controller::PlaybackController;
    use sagaflow_test_support::RecordingEventJournal;

    let journal = Arc::new(RecordingEventJournal::default());
    let controller = PlaybackController::spawn(
        PlaybackConfig::default(),
        Arc::new(SystemClock),
        journal.clone(),
    );
    crate::state::AppState::new(controller, journal)
}
