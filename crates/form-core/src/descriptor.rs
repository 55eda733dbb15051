//! Field descriptors: the per-field records of a UI schema.
//!
//! A descriptor always carries `key` and `type`. Everything else depends on
//! the field kind and is omitted from JSON when unset, so renderers see the
//! same sparse objects regardless of how the form was declared.

use indexmap::IndexMap;
use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};

use crate::enums::{FieldKind, InputType};

/// A materialized UI schema: descriptors in field declaration order.
pub type UiSchema = Vec<Descriptor>;

/// Branch value → nested UI schema, in branch declaration order. `None` when
/// the branch target is not a form (its rendering is up to the consumer).
pub type BranchSchemas = IndexMap<String, Option<UiSchema>>;

/// One selectable option of a `select` or `radio` field.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SelectOption {
    /// Value stored in the instance when this option is picked.
    pub value: serde_json::Value,
    /// Label shown to the user.
    pub view_value: String,
}

impl SelectOption {
    #[must_use]
    pub fn new(value: impl Into<serde_json::Value>, view_value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            view_value: view_value.into(),
        }
    }
}

/// How a single field should be rendered.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Descriptor {
    /// Field name on the form.
    pub key: String,

    #[serde(rename = "type")]
    pub kind: FieldKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,

    /// Initial value. Annotators fall back to the field key when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<InputType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,

    /// Item UI schema of a `list` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listof: Option<UiSchema>,

    /// Nested UI schema of a `subtype` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<UiSchema>,

    /// Sibling field whose value selects the active branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branches: Option<BranchSchemas>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_types: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_url: Option<String>,
}

impl Descriptor {
    /// A bare descriptor with only `key` and `type` set.
    #[must_use]
    pub fn new(key: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: key.into(),
            kind,
            required: None,
            disabled: None,
            default: None,
            max_length: None,
            min_length: None,
            widget: None,
            placeholder: None,
            tooltip: None,
            input_type: None,
            options: None,
            listof: None,
            schema: None,
            branch_key: None,
            branches: None,
            file_types: None,
            upload_url: None,
        }
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

/// JSON Schema of a materialized UI schema, for renderer tooling.
#[must_use]
pub fn descriptor_schema() -> serde_json::Value {
    schema_for!(UiSchema).to_value()
}
