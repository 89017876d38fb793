//! Application layer for the playback context.

pub mod command_handlers;
pub mod conversation;
pub mod query_handlers;
