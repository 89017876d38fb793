//! Script fixtures shared across crates.

use taxbot_script::domain::script::{Script, ScriptStep};

/// Initial step "Hi", one nice step "Step A".
#[must_use]
pub fn single_step_script() -> Script {
    Script::new(
        "Test tagline",
        ScriptStep::nice("Hi"),
        vec![ScriptStep::nice("Step A")],
    )
}

/// Nice greeting, then a nice step, a blank step and an evil step.
#[must_use]
pub fn mixed_mood_script() -> Script {
    Script::new(
        "Test tagline",
        ScriptStep::nice("Hi"),
        vec![
            ScriptStep::nice("Nice step"),
            ScriptStep::evil("   "),
            ScriptStep::evil("Evil step"),
        ],
    )
}
