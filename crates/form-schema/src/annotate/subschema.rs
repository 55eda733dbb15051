//! Nested sub-forms.

use form_core::{Descriptor, FieldKind};

use super::FieldAnnotation;
use crate::builder::FormBuilder;
use crate::form::{Form, FormRef};
use crate::rule::Rule;

/// A field holding one instance of another form. Its rule is the nested
/// form's composite rule.
#[derive(Debug, Clone)]
pub struct SubSchema {
    schema: FormRef,
    widget: Option<String>,
}

impl SubSchema {
    #[must_use]
    pub const fn new(schema: FormRef) -> Self {
        Self {
            schema,
            widget: None,
        }
    }

    #[must_use]
    pub fn of<T: Form>() -> Self {
        Self::new(FormRef::of::<T>())
    }

    #[must_use]
    pub fn widget(mut self, widget: impl Into<String>) -> Self {
        self.widget = Some(widget.into());
        self
    }
}

impl FieldAnnotation for SubSchema {
    fn annotate(self, form: &mut FormBuilder<'_>, key: &str) {
        let name = key.to_string();
        let schema = self.schema;
        let widget = self.widget;
        form.describe(move |materializer| {
            Ok(Descriptor {
                schema: materializer.resolve(&schema)?,
                widget: widget.clone(),
                ..Descriptor::new(name.clone(), FieldKind::Subtype)
            })
        });
        form.constrain(key, move |compiler| {
            compiler.form_rule(&schema).unwrap_or_else(Rule::any)
        });
    }
}
