//! Validation engine settings.

use serde::{Deserialize, Serialize};

/// JSON Schema draft the composite rules are evaluated under.
///
/// Both drafts understand `$defs`, which nested and recursive forms rely on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum SchemaDraft {
    #[serde(rename = "2019-09")]
    Draft201909,
    #[default]
    #[serde(rename = "2020-12")]
    Draft202012,
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ValidationConfig {
    #[serde(default)]
    pub draft: SchemaDraft,

    /// Assert `format` keywords (`email`, `date-time`, `uri`) instead of
    /// treating them as annotations.
    #[serde(default = "default_true")]
    pub validate_formats: bool,

    /// Drop `null` properties from an instance before validating it.
    ///
    /// Form instances are Rust structs, so an optional field that was never
    /// filled in serializes as `null` rather than being left out. Composite
    /// rules only mark a field optional by leaving it out of `required`,
    /// which says nothing about `null`: without stripping, an unset
    /// `Option<String>` would fail a `"type": "string"` rule. Turn this off
    /// when `null` is a meaningful value for some field.
    #[serde(default = "default_true")]
    pub null_as_missing: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            draft: SchemaDraft::default(),
            validate_formats: true,
            null_as_missing: true,
        }
    }
}
