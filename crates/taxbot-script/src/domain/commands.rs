//! Commands for the Script Authoring context.

use taxbot_core::command::Command;
use uuid::Uuid;

use super::script::ScriptStep;

/// A single edit made in the script editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptEdit {
    /// Replace the tagline.
    SetTagline(String),
    /// Replace the initial greeting step.
    SetInitialStep(ScriptStep),
    /// Append an empty, nice step.
    AddStep,
    /// Replace the text of the step at `index`.
    UpdateStepText {
        /// Position in the full step list.
        index: usize,
        /// New text.
        text: String,
    },
    /// Replace the mood of the step at `index`.
    UpdateStepEvil {
        /// Position in the full step list.
        index: usize,
        /// New mood.
        evil: bool,
    },
    /// Remove the step at `index`.
    RemoveStep(usize),
}

impl ScriptEdit {
    /// Short name for log fields.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetTagline(_) => "set_tagline",
            Self::SetInitialStep(_) => "set_initial_step",
            Self::AddStep => "add_step",
            Self::UpdateStepText { .. } => "update_step_text",
            Self::UpdateStepEvil { .. } => "update_step_evil",
            Self::RemoveStep(_) => "remove_step",
        }
    }
}

/// Command to apply one editor change.
#[derive(Debug, Clone)]
pub struct EditScript {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The change to apply.
    pub edit: ScriptEdit,
}

impl Command for EditScript {
    fn command_type(&self) -> &'static str {
        "script.edit"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to replace the script from a JSON document.
#[derive(Debug, Clone)]
pub struct ImportScript {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Raw document text.
    pub document: String,
}

impl Command for ImportScript {
    fn command_type(&self) -> &'static str {
        "script.import"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
