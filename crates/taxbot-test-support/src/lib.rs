//! Shared test doubles and fixtures for the Taxbot-5000 chat.

mod fixtures;
mod scheduler;

pub use fixtures::{mixed_mood_script, single_step_script};
pub use scheduler::ManualScheduler;
