//! Validation rule fragments.
//!
//! A [`Rule`] is one field's contribution to a form's composite rule: a
//! JSON Schema for the field's value, whether the field must be present,
//! and any object-level conditions the field imposes on its form (branch
//! fields dispatch on a sibling's value, which a property schema alone
//! cannot express). Rules are only assembled here; `jsonschema` evaluates
//! them.

use schemars::{Schema, json_schema};
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    schema: Schema,
    required: bool,
    conditions: Vec<Value>,
}

impl Default for Rule {
    fn default() -> Self {
        Self::any()
    }
}

impl Rule {
    /// Optional, any value.
    #[must_use]
    pub fn any() -> Self {
        Self::from_schema(json_schema!({}))
    }

    #[must_use]
    pub fn string() -> Self {
        Self::from_schema(json_schema!({ "type": "string" }))
    }

    #[must_use]
    pub fn number() -> Self {
        Self::from_schema(json_schema!({ "type": "number" }))
    }

    #[must_use]
    pub fn integer() -> Self {
        Self::from_schema(json_schema!({ "type": "integer" }))
    }

    #[must_use]
    pub fn boolean() -> Self {
        Self::from_schema(json_schema!({ "type": "boolean" }))
    }

    #[must_use]
    pub fn array() -> Self {
        Self::from_schema(json_schema!({ "type": "array" }))
    }

    #[must_use]
    pub fn object() -> Self {
        Self::from_schema(json_schema!({ "type": "object" }))
    }

    /// Restrict the value to one of `values`.
    #[must_use]
    pub fn one_of_values(values: impl IntoIterator<Item = Value>) -> Self {
        Self::any().allow_only(values)
    }

    /// Wrap an existing schema, e.g. one produced by `schemars::schema_for!`.
    #[must_use]
    pub const fn from_schema(schema: Schema) -> Self {
        Self {
            schema,
            required: false,
            conditions: Vec::new(),
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    #[must_use]
    pub fn email(self) -> Self {
        self.keyword("format", json!("email"))
    }

    #[must_use]
    pub fn date_time(self) -> Self {
        self.keyword("format", json!("date-time"))
    }

    #[must_use]
    pub fn uri(self) -> Self {
        self.keyword("format", json!("uri"))
    }

    #[must_use]
    pub fn pattern(self, regex: &str) -> Self {
        self.keyword("pattern", json!(regex))
    }

    #[must_use]
    pub fn min_length(self, n: u64) -> Self {
        self.keyword("minLength", json!(n))
    }

    #[must_use]
    pub fn max_length(self, n: u64) -> Self {
        self.keyword("maxLength", json!(n))
    }

    #[must_use]
    pub fn min_items(self, n: u64) -> Self {
        self.keyword("minItems", json!(n))
    }

    #[must_use]
    pub fn max_items(self, n: u64) -> Self {
        self.keyword("maxItems", json!(n))
    }

    #[must_use]
    pub fn minimum(self, n: impl Into<Value>) -> Self {
        self.keyword("minimum", n.into())
    }

    #[must_use]
    pub fn maximum(self, n: impl Into<Value>) -> Self {
        self.keyword("maximum", n.into())
    }

    /// Every array element must satisfy `item`.
    #[must_use]
    pub fn items(self, item: Self) -> Self {
        self.keyword("items", item.schema.to_value())
    }

    /// Narrow the accepted values to `values`, keeping other constraints.
    #[must_use]
    pub fn allow_only(self, values: impl IntoIterator<Item = Value>) -> Self {
        self.keyword("enum", Value::Array(values.into_iter().collect()))
    }

    /// Set an arbitrary JSON Schema keyword.
    #[must_use]
    pub fn keyword(mut self, name: &str, value: Value) -> Self {
        self.schema.insert(name.to_string(), value);
        self
    }

    /// Attach an object-level condition to the enclosing form.
    pub(crate) fn with_condition(mut self, condition: Value) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    pub(crate) fn into_parts(self) -> (Value, bool, Vec<Value>) {
        (self.schema.to_value(), self.required, self.conditions)
    }
}
