//! Conditional fields whose shape is selected by a sibling field's value.

use std::sync::Arc;

use form_core::{BranchSchemas, Descriptor, FieldKind};
use schemars::{JsonSchema, Schema, schema_for};
use serde_json::{Value, json};

use super::{FieldAnnotation, FieldOptions, field_options};
use crate::builder::FormBuilder;
use crate::compile::RuleCompiler;
use crate::form::{Form, FormRef};
use crate::rule::Rule;

/// Declared branches, in declaration order.
pub type BranchMap = Vec<(String, BranchTarget)>;

type BranchesFn = Arc<dyn Fn() -> BranchMap + Send + Sync>;

/// What a branch value selects.
#[derive(Debug, Clone, Copy)]
pub enum BranchTarget {
    /// A schema-bearing form: its UI schema is embedded and its composite
    /// rule applies.
    Form(FormRef),
    /// A plain serde type described by `schemars`. It has no UI schema.
    Typed {
        name: &'static str,
        schema: fn() -> Schema,
    },
}

impl BranchTarget {
    #[must_use]
    pub fn form<T: Form>() -> Self {
        Self::Form(FormRef::of::<T>())
    }

    #[must_use]
    pub fn typed<T: JsonSchema>() -> Self {
        Self::Typed {
            name: std::any::type_name::<T>(),
            schema: typed_schema::<T>,
        }
    }

    fn rule(&self, compiler: &mut RuleCompiler<'_>) -> Value {
        match self {
            Self::Form(form) => compiler
                .form_rule(form)
                .map_or_else(|| json!({}), |rule| rule.schema().as_value().clone()),
            Self::Typed { name, schema } => compiler
                .typed_rule(name, schema())
                .schema()
                .as_value()
                .clone(),
        }
    }
}

fn typed_schema<T: JsonSchema>() -> Schema {
    schema_for!(T)
}

/// How a sibling value that matches no declared branch is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BranchFallback {
    /// The last-declared branch applies.
    #[default]
    LastDeclared,
    /// The sibling must equal one of the declared branch values.
    Reject,
}

/// A field validated against the branch selected by `branch_key`.
///
/// Dispatch is by exact equality with the declared values, first declared
/// match wins; duplicate values after the first are ignored. The branch map
/// is evaluated only when a schema is materialized.
///
/// A branch field is always required, whether or not `.required()` is set.
#[derive(Clone)]
pub struct Branch {
    options: FieldOptions,
    branch_key: String,
    branches: BranchesFn,
    fallback: BranchFallback,
}

field_options!(Branch);

impl Branch {
    pub fn new<F>(branch_key: impl Into<String>, branches: F) -> Self
    where
        F: Fn() -> BranchMap + Send + Sync + 'static,
    {
        Self {
            options: FieldOptions::default(),
            branch_key: branch_key.into(),
            branches: Arc::new(branches),
            fallback: BranchFallback::default(),
        }
    }

    #[must_use]
    pub const fn fallback(mut self, fallback: BranchFallback) -> Self {
        self.fallback = fallback;
        self
    }
}

impl std::fmt::Debug for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Branch")
            .field("options", &self.options)
            .field("branch_key", &self.branch_key)
            .field("branches", &(self.branches)())
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl FieldAnnotation for Branch {
    fn annotate(self, form: &mut FormBuilder<'_>, key: &str) {
        let name = key.to_string();
        let options = self.options;
        let branch_key = self.branch_key.clone();
        let branches = Arc::clone(&self.branches);
        form.describe(move |materializer| {
            let mut schemas = BranchSchemas::new();
            for (value, target) in branches() {
                if schemas.contains_key(&value) {
                    continue;
                }
                let schema = match target {
                    BranchTarget::Form(nested) => materializer.resolve(&nested)?,
                    BranchTarget::Typed { .. } => None,
                };
                schemas.insert(value, schema);
            }
            Ok(Descriptor {
                branch_key: Some(branch_key.clone()),
                branches: Some(schemas),
                widget: options.widget.clone(),
                required: Some(true),
                ..options.descriptor(&name, FieldKind::Branch)
            })
        });

        let previous = form.existing_rule(key);
        let field = key.to_string();
        let branch_key = self.branch_key;
        let branches = self.branches;
        let fallback = self.fallback;
        form.constrain(key, move |compiler| {
            let base = match &previous {
                Some(producer) => producer(compiler),
                None => Rule::any().required(),
            };
            let mut arms: Vec<(String, Value)> = Vec::new();
            for (value, target) in branches() {
                if arms.iter().any(|(seen, _)| *seen == value) {
                    continue;
                }
                let rule = target.rule(compiler);
                arms.push((value, rule));
            }
            match dispatch(&field, &branch_key, arms, fallback) {
                Some(condition) => base.with_condition(condition),
                None => base,
            }
        });
    }
}

/// Nest one `if`/`then`/`else` per branch, innermost last, so the first
/// declared match wins.
fn dispatch(
    field: &str,
    branch_key: &str,
    mut arms: Vec<(String, Value)>,
    fallback: BranchFallback,
) -> Option<Value> {
    let (_, last_rule) = arms.last()?;
    let values: Vec<Value> = arms.iter().map(|(value, _)| json!(value)).collect();
    let mut otherwise = match fallback {
        BranchFallback::LastDeclared => field_schema(field, last_rule.clone()),
        BranchFallback::Reject => json!({
            "properties": { branch_key: { "enum": values } },
            "required": [branch_key],
        }),
    };

    if fallback == BranchFallback::LastDeclared {
        // Already the fallback; testing for it again changes nothing.
        arms.pop();
    }
    for (value, rule) in arms.into_iter().rev() {
        otherwise = json!({
            "if": {
                "properties": { branch_key: { "const": value } },
                "required": [branch_key],
            },
            "then": field_schema(field, rule),
            "else": otherwise,
        });
    }
    Some(otherwise)
}

fn field_schema(field: &str, rule: Value) -> Value {
    json!({ "properties": { field: rule } })
}
