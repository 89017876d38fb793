//! Command handlers for the Script Authoring context.
//!
//! The script is plain in-memory data owned by the conversation, so these
//! handlers apply an edit directly and report what changed.

use tracing::debug;

use crate::domain::commands::ScriptEdit;
use crate::domain::script::Script;

/// What an applied edit changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOutcome {
    /// `false` when the edit targeted an index past the end.
    pub applied: bool,
    /// A step was removed, so positions into the usable script may be stale.
    pub removed: bool,
}

impl EditOutcome {
    const IGNORED: Self = Self {
        applied: false,
        removed: false,
    };
    const APPLIED: Self = Self {
        applied: true,
        removed: false,
    };
}

/// Applies one editor change to `script`. Never fails.
pub fn handle_edit(script: &mut Script, edit: &ScriptEdit) -> EditOutcome {
    let outcome = match edit {
        ScriptEdit::SetTagline(text) => {
            script.set_tagline(text.as_str());
            EditOutcome::APPLIED
        }
        ScriptEdit::SetInitialStep(step) => {
            script.set_initial_step(step.clone());
            EditOutcome::APPLIED
        }
        ScriptEdit::AddStep => {
            script.add_step();
            EditOutcome::APPLIED
        }
        ScriptEdit::UpdateStepText { index, text } => {
            if script.update_step_text(*index, text.as_str()) {
                EditOutcome::APPLIED
            } else {
                EditOutcome::IGNORED
            }
        }
        ScriptEdit::UpdateStepEvil { index, evil } => {
            if script.update_step_evil(*index, *evil) {
                EditOutcome::APPLIED
            } else {
                EditOutcome::IGNORED
            }
        }
        ScriptEdit::RemoveStep(index) => match script.remove_step(*index) {
            Some(_) => EditOutcome {
                applied: true,
                removed: true,
            },
            None => EditOutcome::IGNORED,
        },
    };

    debug!(edit = edit.name(), applied = outcome.applied, "script edit handled");
    outcome
}
