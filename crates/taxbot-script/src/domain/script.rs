//! The script being replayed: steps, initial greeting and tagline.

use serde::{Deserialize, Serialize};

/// Greeting shown when the initial step is blank.
pub const DEFAULT_GREETING: &str =
    "Welcome to Taxbot-5000. Type anything to begin the scripted conversation.";

/// Tagline shown when the tagline field is blank.
pub const DEFAULT_TAGLINE: &str = "Fast, friendly tax guidance for every filer.";

/// White space as the editor sees it: Unicode white space plus the
/// byte-order mark, which `char::is_whitespace` does not cover.
#[must_use]
pub fn is_text_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

/// `text` without leading and trailing [`is_text_space`] characters.
#[must_use]
pub fn trim_text(text: &str) -> &str {
    text.trim_matches(is_text_space)
}

/// One canned assistant reply and its mood.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Reply text as typed in the editor. May be blank.
    pub text: String,
    /// `true` for the evil theme, `false` for the nice one.
    pub evil: bool,
}

impl ScriptStep {
    /// Creates a step.
    #[must_use]
    pub fn new(text: impl Into<String>, evil: bool) -> Self {
        Self {
            text: text.into(),
            evil,
        }
    }

    /// Creates a nice step.
    #[must_use]
    pub fn nice(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    /// Creates an evil step.
    #[must_use]
    pub fn evil(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }
}

/// The editable script.
///
/// Order of `steps` is playback order. Index-based edits with an index past
/// the end are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    tagline: String,
    initial_step: ScriptStep,
    steps: Vec<ScriptStep>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            tagline: DEFAULT_TAGLINE.to_owned(),
            initial_step: ScriptStep::nice(DEFAULT_GREETING),
            steps: vec![
                ScriptStep::nice("Hello! I am Taxbot-5000. Let's walk through your taxes."),
                ScriptStep::nice("Great. First, can you confirm your employment status?"),
                ScriptStep::evil("Thanks. Next, gather your income statements (W-2, 1099, etc.)."),
                ScriptStep::evil("Perfect. We are now moving to deductions and credits."),
            ],
        }
    }
}

impl Script {
    /// Creates a script from its parts.
    #[must_use]
    pub fn new(
        tagline: impl Into<String>,
        initial_step: ScriptStep,
        steps: Vec<ScriptStep>,
    ) -> Self {
        Self {
            tagline: tagline.into(),
            initial_step,
            steps,
        }
    }

    /// The tagline exactly as edited.
    #[must_use]
    pub fn tagline(&self) -> &str {
        &self.tagline
    }

    /// The tagline to display: trimmed, or the default when blank.
    #[must_use]
    pub fn display_tagline(&self) -> &str {
        match trim_text(&self.tagline) {
            "" => DEFAULT_TAGLINE,
            trimmed => trimmed,
        }
    }

    /// The initial step exactly as edited.
    #[must_use]
    pub fn initial_step(&self) -> &ScriptStep {
        &self.initial_step
    }

    /// The greeting that opens a fresh transcript.
    #[must_use]
    pub fn greeting(&self) -> &str {
        match trim_text(&self.initial_step.text) {
            "" => DEFAULT_GREETING,
            trimmed => trimmed,
        }
    }

    /// All steps, blank ones included.
    #[must_use]
    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    /// The steps playback consumes: text trimmed, blank steps dropped, order
    /// kept.
    #[must_use]
    pub fn usable_steps(&self) -> Vec<ScriptStep> {
        self.steps
            .iter()
            .filter_map(|step| {
                let text = trim_text(&step.text);
                (!text.is_empty()).then(|| ScriptStep::new(text, step.evil))
            })
            .collect()
    }

    /// Number of usable steps.
    #[must_use]
    pub fn usable_len(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| !trim_text(&step.text).is_empty())
            .count()
    }

    /// Replaces the tagline.
    pub fn set_tagline(&mut self, tagline: impl Into<String>) {
        self.tagline = tagline.into();
    }

    /// Replaces the initial greeting step.
    pub fn set_initial_step(&mut self, step: ScriptStep) {
        self.initial_step = step;
    }

    /// Appends an empty, nice step.
    pub fn add_step(&mut self) {
        self.steps.push(ScriptStep::default());
    }

    /// Returns `false` when `index` is out of range.
    pub fn update_step_text(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.steps.get_mut(index) {
            Some(step) => {
                step.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Returns `false` when `index` is out of range.
    pub fn update_step_evil(&mut self, index: usize, evil: bool) -> bool {
        match self.steps.get_mut(index) {
            Some(step) => {
                step.evil = evil;
                true
            }
            None => false,
        }
    }

    /// Returns the removed step, or `None` when `index` is out of range.
    pub fn remove_step(&mut self, index: usize) -> Option<ScriptStep> {
        (index < self.steps.len()).then(|| self.steps.remove(index))
    }
}
