//! Query handlers for the Script Authoring context.
//!
//! Builds the read-only editor view the script panel binds to.

use serde::Serialize;

use crate::domain::script::{Script, ScriptStep, trim_text};

/// One row of the step list in the editor.
#[derive(Debug, Clone, Serialize)]
pub struct StepView {
    /// Position in the full step list (used for edits).
    pub index: usize,
    /// Text as edited.
    pub text: String,
    /// Mood flag.
    pub evil: bool,
    /// `false` for blank steps, which playback skips.
    pub usable: bool,
}

/// Read-only view of the script editor.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptView {
    /// Tagline as edited.
    pub tagline: String,
    /// Tagline as displayed in the chat header.
    pub display_tagline: String,
    /// The greeting step.
    pub initial_step: ScriptStep,
    /// All steps in order.
    pub steps: Vec<StepView>,
    /// Number of steps playback will consume.
    pub usable_count: usize,
}

/// Builds the editor view of `script`.
#[must_use]
pub fn get_script_view(script: &Script) -> ScriptView {
    let steps = script
        .steps()
        .iter()
        .enumerate()
        .map(|(index, step)| StepView {
            index,
            text: step.text.clone(),
            evil: step.evil,
            usable: !trim_text(&step.text).is_empty(),
        })
        .collect();

    ScriptView {
        tagline: script.tagline().to_owned(),
        display_tagline: script.display_tagline().to_owned(),
        initial_step: script.initial_step().clone(),
        steps,
        usable_count: script.usable_len(),
    }
}
