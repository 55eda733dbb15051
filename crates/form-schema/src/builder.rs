//! The registration handle passed to [`Form::declare`](crate::Form::declare).

use std::sync::Arc;

use form_core::Descriptor;

use crate::annotate::FieldAnnotation;
use crate::compile::RuleCompiler;
use crate::error::SchemaError;
use crate::form::{FormId, FormRef};
use crate::materialize::Materializer;
use crate::registry::{FormMetadata, FormRegistry, RuleProducer};
use crate::rule::Rule;

/// Collects one form's field registrations.
///
/// Registrations land in a scratch record that the registry installs and
/// finalizes once `declare` returns, so each annotation is applied
/// atomically with respect to other readers.
pub struct FormBuilder<'r> {
    registry: &'r FormRegistry,
    form: FormId,
    metadata: FormMetadata,
}

impl<'r> FormBuilder<'r> {
    pub(crate) fn new(registry: &'r FormRegistry, form: FormId) -> Self {
        Self {
            registry,
            form,
            metadata: FormMetadata::default(),
        }
    }

    pub(crate) fn into_metadata(self) -> FormMetadata {
        self.metadata
    }

    /// The form being declared.
    #[must_use]
    pub const fn id(&self) -> FormId {
        self.form
    }

    /// Annotate field `key`.
    pub fn field(&mut self, key: &str, annotation: impl FieldAnnotation) -> FieldHandle<'_, 'r> {
        annotation.annotate(self, key);
        FieldHandle {
            builder: self,
            key: key.to_string(),
        }
    }

    /// Copy every field and rule of `base` into this form, in order.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotSchemaClass` if `base` does not resolve to a
    /// finalized form, and propagates errors from registering `base`
    /// (`SchemaError::RecursiveForm` when `base` includes this form).
    pub fn include(&mut self, base: FormRef) -> Result<(), SchemaError> {
        let metadata =
            self.registry
                .try_resolve(&base)?
                .ok_or_else(|| SchemaError::NotSchemaClass {
                    form: base.id().name().to_string(),
                })?;
        self.metadata.extend(&metadata);
        Ok(())
    }

    /// Append a descriptor producer.
    pub fn describe<F>(&mut self, producer: F)
    where
        F: Fn(&mut Materializer<'_>) -> Result<Descriptor, SchemaError> + Send + Sync + 'static,
    {
        self.metadata.register(Arc::new(producer));
    }

    /// Set the rule producer for `key`, replacing any earlier one.
    pub fn constrain<F>(&mut self, key: &str, producer: F)
    where
        F: Fn(&mut RuleCompiler<'_>) -> Rule + Send + Sync + 'static,
    {
        self.metadata.register_rule(key, Arc::new(producer));
    }

    /// The rule producer currently registered for `key`, for annotators
    /// that narrow an existing rule instead of replacing it.
    #[must_use]
    pub fn existing_rule(&self, key: &str) -> Option<RuleProducer> {
        self.metadata.rule(key)
    }
}

/// Returned by [`FormBuilder::field`] to attach a custom validator.
pub struct FieldHandle<'b, 'r> {
    builder: &'b mut FormBuilder<'r>,
    key: String,
}

impl FieldHandle<'_, '_> {
    /// Replace the field's rule with `rule`. The last rule applied to a
    /// field wins.
    pub fn validate(self, rule: Rule) {
        self.builder.constrain(&self.key, move |_| rule.clone());
    }
}
