//! Taxbot Core — shared abstractions.
//!
//! This crate defines the traits and types the script and playback contexts
//! depend on: the scheduler seam, command and event envelopes, and the error
//! taxonomy. It contains no runtime code.

pub mod command;
pub mod error;
pub mod event;
pub mod scheduler;
