//! Infrastructure adapters for the playback context.

pub mod in_memory_journal;
