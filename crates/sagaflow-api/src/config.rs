//! Server configuration read from the environment.

use std::net::SocketAddr;

use sagaflow_playback::application::config::PlaybackConfig;

use crate::error::AppError;

/// Settings resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address the listener binds to.
    pub addr: SocketAddr,
    /// Controller settings.
    pub playback: PlaybackConfig,
}

impl ServerConfig {
    /// Reads `HOST`, `PORT`, `PLAYBACK_TIME_SCALE` and
    /// `PLAYBACK_COMMAND_BUFFER` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a value is present but invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`, which returns the value of a
    /// variable or `None` when unset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a value is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let port: u16 = lookup("PORT")
            .unwrap_or_else(|| "3000".to_owned())
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;
        let addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;

        let mut playback = PlaybackConfig::default();
        if let Some(raw) = lookup("PLAYBACK_TIME_SCALE") {
            let time_scale: f64 = raw.parse().map_err(|e| {
                AppError::Config(format!("PLAYBACK_TIME_SCALE must be a number: {e}"))
            })?;
            playback = playback
                .with_time_scale(time_scale)
                .map_err(|e| AppError::Config(e.to_string()))?;
        }
        if let Some(raw) = lookup("PLAYBACK_COMMAND_BUFFER") {
            let command_buffer: usize = raw.parse().map_err(|e| {
                AppError::Config(format!("PLAYBACK_COMMAND_BUFFER must be a count: {e}"))
            })?;
            playback = playback
                .with_command_buffer(command_buffer)
                .map_err(|e| AppError::Config(e.to_string()))?;
        }

        Ok(Self { addr, playback })
    }
}
