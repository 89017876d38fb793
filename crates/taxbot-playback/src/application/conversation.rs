//! The conversation: one script, one playback engine, one status line.
//!
//! The script is only ever changed through editor edits or an import; the
//! engine only reads the usable script derived from it at the moment it
//! needs it, so edits made mid-reply are seen by the next send.

use taxbot_core::error::ImportError;
use taxbot_core::scheduler::{Scheduler, TimerHandle};
use taxbot_script::application::command_handlers::{EditOutcome, handle_edit};
use taxbot_script::domain::codec::{self, SCRIPT_FILE_NAME, ScriptDocument};
use taxbot_script::domain::commands::ScriptEdit;
use taxbot_script::domain::script::Script;
use uuid::Uuid;

use crate::domain::engine::PlaybackEngine;
use crate::domain::events::PlaybackEvent;
use crate::domain::state::Theme;
use crate::domain::timing::PlaybackTiming;

/// Script plus playback state, updated as one value.
#[derive(Debug)]
pub struct Conversation {
    script: Script,
    engine: PlaybackEngine,
    status: Option<String>,
}

impl Conversation {
    /// Starts a conversation greeting with `script`'s initial step.
    #[must_use]
    pub fn new(script: Script, scheduler: Box<dyn Scheduler>, timing: PlaybackTiming) -> Self {
        let engine = PlaybackEngine::new(scheduler, timing, script.greeting());
        Self {
            script,
            engine,
            status: None,
        }
    }

    #[must_use]
    pub fn script(&self) -> &Script {
        &self.script
    }

    #[must_use]
    pub fn engine(&self) -> &PlaybackEngine {
        &self.engine
    }

    /// Last import/export status message.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Theme resolved against the current script.
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.engine
            .theme(self.script.initial_step().evil, &self.script.usable_steps())
    }

    /// See [`PlaybackEngine::send`].
    pub fn send(&mut self, text: &str, correlation_id: Uuid) -> bool {
        let usable = self.script.usable_steps();
        self.engine.send(text, &usable, correlation_id)
    }

    /// See [`PlaybackEngine::on_timer`].
    pub fn fire_timer(&mut self, handle: TimerHandle) -> bool {
        let usable_len = self.script.usable_len();
        self.engine.on_timer(handle, usable_len)
    }

    /// Starts over from the current greeting.
    pub fn reset(&mut self, correlation_id: Uuid) {
        self.engine.reset(self.script.greeting(), correlation_id);
    }

    /// Applies an editor change, then keeps playback consistent with it.
    pub fn edit(&mut self, edit: &ScriptEdit) -> EditOutcome {
        let outcome = handle_edit(&mut self.script, edit);
        if outcome.removed {
            self.engine.clamp_script_index(self.script.usable_len());
        }
        if let ScriptEdit::SetInitialStep(_) = edit {
            self.engine.sync_greeting(self.script.greeting());
        }
        outcome
    }

    /// Replaces the script from a raw document and restarts playback.
    /// Returns the number of imported steps.
    ///
    /// # Errors
    ///
    /// Returns the `ImportError` unchanged; the script and transcript are
    /// left as they were and the status line reports the failure.
    pub fn import(&mut self, raw: &str, correlation_id: Uuid) -> Result<usize, ImportError> {
        match codec::import_str(raw) {
            Ok(script) => {
                let count = script.steps().len();
                self.script = script;
                self.engine.reset(self.script.greeting(), correlation_id);
                self.status = Some(format!("Imported {count} script steps."));
                Ok(count)
            }
            Err(err) => {
                self.status = Some(format!("Import failed: {err}"));
                Err(err)
            }
        }
    }

    /// Captures the script for download as [`SCRIPT_FILE_NAME`].
    pub fn export(&mut self) -> ScriptDocument {
        self.status = Some(format!("Exported {SCRIPT_FILE_NAME}."));
        codec::export(&self.script)
    }

    /// Tears down playback; pending timers are cancelled.
    pub fn dispose(&mut self) {
        self.engine.dispose();
    }

    /// Takes the playback events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        self.engine.drain_events()
    }
}
