//! Feeds fired timers into the conversation.

use std::sync::{Arc, Mutex};

use taxbot_core::scheduler::TimerHandle;
use taxbot_playback::application::command_handlers;
use taxbot_playback::application::conversation::Conversation;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Spawns the task that delivers every fired handle to `conversation`.
///
/// The task ends when the scheduler's sender is dropped or the conversation
/// becomes unreachable.
pub fn spawn_timer_driver(
    conversation: Arc<Mutex<Conversation>>,
    mut fired: UnboundedReceiver<TimerHandle>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(handle) = fired.recv().await {
            if let Err(err) = command_handlers::handle_timer_fired(&conversation, handle) {
                error!(%handle, error = %err, "timer delivery failed");
                break;
            }
        }
        debug!("timer driver stopped");
    })
}
