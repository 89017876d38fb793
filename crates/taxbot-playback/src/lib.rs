//! Taxbot-5000 — scripted-reply playback bounded context.
//!
//! Responsible for replaying the script as a chat: the typing delay, the
//! word-by-word reveal, stage advancement and the mood/theme transition.
//! The [`application::conversation::Conversation`] ties the engine to the
//! script it reads from.

pub mod application;
pub mod domain;
