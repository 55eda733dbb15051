//! UI schema materialization.

use form_core::UiSchema;

use crate::error::SchemaError;
use crate::form::{FormId, FormRef};
use crate::registry::{FormMetadata, FormRegistry};

/// Runs descriptor producers, resolving nested form references on the way.
///
/// Keeps the stack of forms being materialized so a form that embeds
/// itself (directly or through others) fails instead of recursing forever.
pub struct Materializer<'r> {
    registry: &'r FormRegistry,
    stack: Vec<FormId>,
}

impl<'r> Materializer<'r> {
    pub(crate) const fn new(registry: &'r FormRegistry) -> Self {
        Self {
            registry,
            stack: Vec::new(),
        }
    }

    pub(crate) fn form(
        &mut self,
        form: FormId,
        metadata: &FormMetadata,
    ) -> Result<UiSchema, SchemaError> {
        if self.stack.contains(&form) {
            let path = self
                .stack
                .iter()
                .chain(std::iter::once(&form))
                .map(|id| id.short_name().to_string())
                .collect();
            return Err(SchemaError::RecursiveForm { path });
        }

        self.stack.push(form);
        let schema = metadata
            .producers()
            .iter()
            .map(|producer| producer(self))
            .collect();
        self.stack.pop();
        schema
    }

    /// UI schema of a referenced form, or `None` if it is not schema-bearing.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::RecursiveForm` if `form` is already being
    /// materialized further up the stack.
    pub fn resolve(&mut self, form: &FormRef) -> Result<Option<UiSchema>, SchemaError> {
        match self.registry.resolve(form) {
            Some(metadata) => self.form(form.id(), &metadata).map(Some),
            None => Ok(None),
        }
    }
}
