//! Read-only queries over the scenario catalogue.

pub mod query_handlers;
