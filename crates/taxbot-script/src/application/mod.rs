//! Application layer for the Script Authoring context.

pub mod command_handlers;
pub mod query_handlers;
