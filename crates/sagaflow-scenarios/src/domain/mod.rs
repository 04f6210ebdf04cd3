//! Domain types for the scenario catalogue.

pub mod catalog;
pub mod participant;
pub mod scenario;
pub mod step;
