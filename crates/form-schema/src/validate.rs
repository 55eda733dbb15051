//! Instance validation against composite rules.
//!
//! Evaluation is delegated to `jsonschema`. One pass per call, run on the
//! blocking pool; there is no retry and no timeout.

use std::future::Future;

use form_config::{SchemaDraft, ValidationConfig};
use jsonschema::Draft;
use serde::Serialize;
use serde_json::Value;

use crate::error::{SchemaError, Violation};
use crate::form::{Form, FormId};
use crate::registry::FormRegistry;

/// Validation of a form's own values.
///
/// Implemented for every form type that serializes to a JSON object whose
/// keys are the declared field keys.
pub trait FormInstance: Form + Serialize {
    /// Run this instance through its form's composite rule. Resolves with
    /// the validated value (nulls stripped when `null_as_missing` is set).
    ///
    /// The form is registered first if it has not been yet.
    fn validate(
        &self,
        registry: &FormRegistry,
        config: &ValidationConfig,
    ) -> impl Future<Output = Result<Value, SchemaError>> + Send;
}

impl<T: Form + Serialize> FormInstance for T {
    fn validate(
        &self,
        registry: &FormRegistry,
        config: &ValidationConfig,
    ) -> impl Future<Output = Result<Value, SchemaError>> + Send {
        // Snapshot everything up front so the future borrows nothing.
        let prepared = registry
            .register_form::<T>()
            .and_then(|()| registry.validation_schema(FormId::of::<T>()))
            .and_then(|schema| Ok((schema, serde_json::to_value(self)?)));
        let config = config.clone();
        async move {
            let (schema, instance) = prepared?;
            validate_value(schema, instance, &config).await
        }
    }
}

/// Validate `instance` against an already compiled `schema`.
///
/// # Errors
///
/// `SchemaError::ValidationFailed` with every violation the engine reports,
/// `SchemaError::Compile` if `schema` is not a usable JSON Schema, or
/// `SchemaError::Join` if the blocking task panicked.
pub async fn validate_value(
    schema: Value,
    instance: Value,
    config: &ValidationConfig,
) -> Result<Value, SchemaError> {
    let config = config.clone();
    tokio::task::spawn_blocking(move || check(&schema, instance, &config))
        .await
        .map_err(|e| SchemaError::Join(e.to_string()))?
}

/// Synchronous form of [`validate_value`].
///
/// # Errors
///
/// See [`validate_value`].
pub fn check(
    schema: &Value,
    instance: Value,
    config: &ValidationConfig,
) -> Result<Value, SchemaError> {
    let validator = jsonschema::options()
        .with_draft(engine_draft(config.draft))
        .should_validate_formats(config.validate_formats)
        .build(schema)
        .map_err(|e| SchemaError::Compile(e.to_string()))?;

    let instance = if config.null_as_missing {
        strip_nulls(instance)
    } else {
        instance
    };

    let violations: Vec<Violation> = validator
        .iter_errors(&instance)
        .map(Violation::from)
        .collect();
    if violations.is_empty() {
        Ok(instance)
    } else {
        tracing::debug!(count = violations.len(), "instance rejected");
        Err(SchemaError::ValidationFailed { violations })
    }
}

const fn engine_draft(draft: SchemaDraft) -> Draft {
    match draft {
        SchemaDraft::Draft201909 => Draft::Draft201909,
        SchemaDraft::Draft202012 => Draft::Draft202012,
    }
}

/// Remove `null` object properties at every depth. Nulls inside arrays are
/// values, not missing fields, and are kept.
fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nulls).collect()),
        other => other,
    }
}
