//! Shared application state.

use std::sync::Arc;

use sagaflow_core::journal::EventJournal;
use sagaflow_playback::application::controller::PlaybackController;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Handle to the single playback driver.
    pub controller: PlaybackController,
    /// Journal the controller appends to, read by the events endpoint.
    pub journal: Arc<dyn EventJournal>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(controller: PlaybackController, journal: Arc<dyn EventJournal>) -> Self {
        Self {
            controller,
            journal,
        }
    }
}
