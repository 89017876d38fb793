//! Shared application state.

use std::sync::{Arc, Mutex};

use taxbot_playback::application::conversation::Conversation;

/// Application state shared across all request handlers and the timer
/// driver.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The single conversation served by this process.
    pub conversation: Arc<Mutex<Conversation>>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(conversation: Conversation) -> Self {
        Self {
            conversation: Arc::new(Mutex::new(conversation)),
        }
    }
}
