//! Domain model for the playback context.

pub mod commands;
pub mod engine;
pub mod events;
pub mod state;
pub mod timing;
pub mod transcript;
