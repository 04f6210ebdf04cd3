//! Sagaflow: scenario catalogue.
//!
//! Holds the fixed participants and the three hand-authored order
//! choreographies (success, payment failure, shipment failure) that the
//! playback controller reveals step by step.

pub mod application;
pub mod domain;
