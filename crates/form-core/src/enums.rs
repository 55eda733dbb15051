//! Field kinds and input types.
//!
//! Both enums serialize as `snake_case` strings, which is the form the
//! rendering layer switches on.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// FieldKind
// ---------------------------------------------------------------------------

/// The `type` tag of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Input,
    Custom,
    List,
    Timestamp,
    Select,
    Radio,
    File,
    Branch,
    Subtype,
}

impl FieldKind {
    pub const ALL: [Self; 9] = [
        Self::Input,
        Self::Custom,
        Self::List,
        Self::Timestamp,
        Self::Select,
        Self::Radio,
        Self::File,
        Self::Branch,
        Self::Subtype,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Custom => "custom",
            Self::List => "list",
            Self::Timestamp => "timestamp",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::File => "file",
            Self::Branch => "branch",
            Self::Subtype => "subtype",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CoreError::UnknownFieldKind(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// InputType
// ---------------------------------------------------------------------------

/// Advisory input type of an `input` descriptor.
///
/// Purely a rendering hint: values are never coerced based on it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    #[default]
    Text,
    Number,
    Email,
}

impl InputType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "email" => Ok(Self::Email),
            other => Err(CoreError::UnknownInputType(other.to_string())),
        }
    }
}
