//! Playback domain: commands, events and the session aggregate.

pub mod aggregates;
pub mod commands;
pub mod events;
