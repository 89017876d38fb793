//! Route modules organized by bounded context.

pub mod chat;
pub mod health;
pub mod script;
