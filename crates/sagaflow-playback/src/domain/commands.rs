//! Commands for the playback context.

use sagaflow_core::command::Command;
use uuid::Uuid;

/// Command to start or resume playback.
#[derive(Debug, Clone)]
pub struct StartPlayback {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for StartPlayback {
    fn command_type(&self) -> &'static str {
        "playback.start"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to pause playback, abandoning the in-flight step's wait.
#[derive(Debug, Clone)]
pub struct PausePlayback {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for PausePlayback {
    fn command_type(&self) -> &'static str {
        "playback.pause"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to rewind to the first step and stop.
#[derive(Debug, Clone)]
pub struct ResetPlayback {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for ResetPlayback {
    fn command_type(&self) -> &'static str {
        "playback.reset"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command that pauses when playing and starts otherwise.
#[derive(Debug, Clone)]
pub struct TogglePlayback {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for TogglePlayback {
    fn command_type(&self) -> &'static str {
        "playback.toggle"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to switch the active scenario.
#[derive(Debug, Clone)]
pub struct SelectScenario {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Wire name of the scenario; validated by the aggregate.
    pub scenario: String,
}

impl Command for SelectScenario {
    fn command_type(&self) -> &'static str {
        "playback.select_scenario"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Any command the playback controller accepts.
#[derive(Debug, Clone)]
pub enum PlaybackCommand {
    /// See [`StartPlayback`].
    Start(StartPlayback),
    /// See [`PausePlayback`].
    Pause(PausePlayback),
    /// See [`ResetPlayback`].
    Reset(ResetPlayback),
    /// See [`TogglePlayback`].
    Toggle(TogglePlayback),
    /// See [`SelectScenario`].
    SelectScenario(SelectScenario),
}

impl PlaybackCommand {
    fn inner(&self) -> &dyn Command {
        match self {
            Self::Start(command) => command,
            Self::Pause(command) => command,
            Self::Reset(command) => command,
            Self::Toggle(command) => command,
            Self::SelectScenario(command) => command,
        }
    }
}

impl Command for PlaybackCommand {
    fn command_type(&self) -> &'static str {
        self.inner().command_type()
    }

    fn correlation_id(&self) -> Uuid {
        self.inner().correlation_id()
    }
}
