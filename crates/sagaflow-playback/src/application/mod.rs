//! Application layer: the async driver, its configuration and read views.

pub mod config;
pub mod controller;
pub mod query_handlers;
