//! Domain model for the Script Authoring context.

pub mod codec;
pub mod commands;
pub mod script;
