//! JSON document format for script export and import.
//!
//! Export always writes the current shape:
//!
//! ```json
//! { "version": 1, "tagline": "...", "initialStep": {"text": "...", "evil": false},
//!   "steps": [{"text": "...", "evil": true}] }
//! ```
//!
//! Import is lenient. It accepts a bare array as the steps list, the older
//! `scriptedResponses` and `script` keys, and plain strings as steps.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use taxbot_core::error::ImportError;

use super::script::{DEFAULT_GREETING, DEFAULT_TAGLINE, Script, ScriptStep};

/// Fixed file name offered for exported scripts.
pub const SCRIPT_FILE_NAME: &str = "taxbot-script.json";

/// Version written on export.
pub const DOCUMENT_VERSION: u32 = 1;

/// Keys that may hold the steps array, in priority order.
const STEP_KEYS: [&str; 3] = ["steps", "scriptedResponses", "script"];

/// Serialized form of a [`Script`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptDocument {
    /// Format version, always [`DOCUMENT_VERSION`] on export.
    pub version: u32,
    /// Tagline as edited.
    pub tagline: String,
    /// The greeting step.
    pub initial_step: ScriptStep,
    /// All steps, blank ones included.
    pub steps: Vec<ScriptStep>,
}

impl ScriptDocument {
    /// Pretty-printed JSON, as written to [`SCRIPT_FILE_NAME`].
    #[must_use]
    pub fn to_json_pretty(&self) -> String {
        // Plain strings and booleans always serialize.
        serde_json::to_string_pretty(self).expect("ScriptDocument serialization is infallible")
    }
}

/// Captures the whole script as a document.
#[must_use]
pub fn export(script: &Script) -> ScriptDocument {
    ScriptDocument {
        version: DOCUMENT_VERSION,
        tagline: script.tagline().to_owned(),
        initial_step: script.initial_step().clone(),
        steps: script.steps().to_vec(),
    }
}

/// Parses and normalizes a raw JSON document.
///
/// # Errors
///
/// Returns `ImportError::Malformed` if `raw` is not JSON, otherwise see
/// [`import_value`].
pub fn import_str(raw: &str) -> Result<Script, ImportError> {
    let document: Value =
        serde_json::from_str(raw).map_err(|e| ImportError::Malformed(e.to_string()))?;
    import_value(&document)
}

/// Normalizes an already parsed document into a [`Script`].
///
/// # Errors
///
/// Returns `ImportError::MissingSteps` if no steps array is found and
/// `ImportError::NoValidSteps` if every entry was dropped.
pub fn import_value(document: &Value) -> Result<Script, ImportError> {
    let (entries, fields) = match document {
        Value::Array(entries) => (entries, None),
        Value::Object(fields) => {
            let entries = STEP_KEYS
                .iter()
                .find_map(|key| fields.get(*key))
                .and_then(Value::as_array)
                .ok_or(ImportError::MissingSteps)?;
            (entries, Some(fields))
        }
        _ => return Err(ImportError::MissingSteps),
    };

    let steps: Vec<ScriptStep> = entries.iter().filter_map(normalize_step).collect();
    if steps.is_empty() {
        return Err(ImportError::NoValidSteps);
    }

    let tagline = fields
        .and_then(|f| f.get("tagline"))
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_TAGLINE);
    let initial_step = fields
        .and_then(|f| f.get("initialStep"))
        .and_then(normalize_step)
        .unwrap_or_else(|| ScriptStep::nice(DEFAULT_GREETING));

    Ok(Script::new(tagline, initial_step, steps))
}

fn normalize_step(entry: &Value) -> Option<ScriptStep> {
    match entry {
        Value::String(text) => Some(ScriptStep::nice(text.as_str())),
        Value::Object(fields) => {
            let text = fields.get("text").and_then(Value::as_str).unwrap_or_default();
            let evil = fields.get("evil").is_some_and(is_truthy);
            Some(ScriptStep::new(text, evil))
        }
        _ => None,
    }
}

/// Boolean coercion matching what older exporters produced: `1`, `"yes"` and
/// the like are evil; `0`, `""` and `null` are not.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
