//! Error types.

use thiserror::Error;

/// Reasons a script document can be rejected on import.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// The document is not valid JSON.
    #[error("malformed document: {0}")]
    Malformed(String),

    /// No `steps`, `scriptedResponses` or `script` array was found.
    #[error("missing steps")]
    MissingSteps,

    /// A steps array was found but no entry survived normalization.
    #[error("no valid steps")]
    NoValidSteps,
}

/// Top-level error type for the application handlers.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A script document was rejected; the current script is untouched.
    #[error("import failed: {0}")]
    Import(#[from] ImportError),

    /// Shared state could not be reached (e.g. a poisoned lock).
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_error_messages_are_short_status_strings() {
        assert_eq!(ImportError::MissingSteps.to_string(), "missing steps");
        assert_eq!(ImportError::NoValidSteps.to_string(), "no valid steps");
    }

    #[test]
    fn test_domain_error_wraps_import_error() {
        let err: DomainError = ImportError::MissingSteps.into();
        assert_eq!(err.to_string(), "import failed: missing steps");
    }
}
