//! Schema registration and validation error types.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// One offending value reported by the validation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// JSON pointer to the offending value inside the instance (`""` is the
    /// instance itself, e.g. for missing required fields).
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

impl From<jsonschema::ValidationError<'_>> for Violation {
    fn from(error: jsonschema::ValidationError<'_>) -> Self {
        Self {
            path: error.instance_path.to_string(),
            message: error.to_string(),
        }
    }
}

/// Errors from the form registry and instance validation.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Finalization was attempted on a form without annotated fields.
    #[error("Form with no fields: {form}")]
    NoFields { form: String },

    /// The form was never registered and finalized.
    #[error("Not a schema-bearing form: {form}")]
    NotSchemaClass { form: String },

    /// Registration against a form that is already finalized.
    #[error("Form already finalized: {form}")]
    AlreadyFinalized { form: String },

    /// UI materialization re-entered a form that is still being materialized.
    #[error("Recursive form reference: {}", path.join(" -> "))]
    RecursiveForm { path: Vec<String> },

    /// The instance did not satisfy the composite rule.
    #[error("Validation failed: {}", join_violations(violations))]
    ValidationFailed { violations: Vec<Violation> },

    /// The instance could not be serialized to JSON.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The validation engine rejected the assembled rule.
    #[error("Rule compilation error: {0}")]
    Compile(String),

    /// The background validation task did not complete.
    #[error("Validation task failed: {0}")]
    Join(String),
}

impl SchemaError {
    /// Violations carried by a `ValidationFailed` error; empty otherwise.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::ValidationFailed { violations } => violations,
            _ => &[],
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
