//! Controller configuration.

use std::time::Duration;

use sagaflow_core::error::FlowError;

/// Tunables for a [`PlaybackController`](super::controller::PlaybackController).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackConfig {
    time_scale: f64,
    command_buffer: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            command_buffer: 32,
        }
    }
}

impl PlaybackConfig {
    /// Multiplies every step delay by `time_scale`.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::Validation` unless `time_scale` is finite and
    /// strictly positive.
    pub fn with_time_scale(mut self, time_scale: f64) -> Result<Self, FlowError> {
        if !time_scale.is_finite() || time_scale <= 0.0 {
            return Err(FlowError::Validation(format!(
                "time scale must be a positive number, got {time_scale}"
            )));
        }
        self.time_scale = time_scale;
        Ok(self)
    }

    /// Capacity of the controller's command queue.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::Validation` if `command_buffer` is zero.
    pub fn with_command_buffer(mut self, command_buffer: usize) -> Result<Self, FlowError> {
        if command_buffer == 0 {
            return Err(FlowError::Validation(
                "command buffer must hold at least one command".to_owned(),
            ));
        }
        self.command_buffer = command_buffer;
        Ok(self)
    }

    /// The configured delay multiplier.
    #[must_use]
    pub const fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// The configured queue capacity.
    #[must_use]
    pub const fn command_buffer(&self) -> usize {
        self.command_buffer
    }

    /// Applies the time scale to `delay`, rounded to the nearest nanosecond
    /// and saturating at `u64::MAX` nanoseconds.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn scaled(&self, delay: Duration) -> Duration {
        let nanos = (delay.as_nanos() as f64 * self.time_scale).round();
        if nanos >= u64::MAX as f64 {
            return Duration::from_nanos(u64::MAX);
        }
        Duration::from_nanos(nanos as u64)
    }
}
