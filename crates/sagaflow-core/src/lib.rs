//! Sagaflow Core: shared domain abstractions.
//!
//! Traits and types shared by the scenario catalogue, the playback
//! controller and the HTTP surface. Contains no infrastructure code.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod journal;
