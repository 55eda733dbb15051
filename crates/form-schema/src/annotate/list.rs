//! Homogeneous lists of sub-forms.

use std::sync::Arc;

use form_core::{Descriptor, FieldKind};

use super::{FieldAnnotation, FieldOptions, field_options};
use crate::builder::FormBuilder;
use crate::form::{Form, FormRef};
use crate::rule::Rule;

type ItemRef = Arc<dyn Fn() -> FormRef + Send + Sync>;

/// A list whose items are instances of another form.
///
/// The item form is looked up only when a schema is materialized, so two
/// forms may list each other regardless of which is declared first.
#[derive(Clone)]
pub struct List {
    options: FieldOptions,
    listof: ItemRef,
}

field_options!(List);

impl List {
    pub fn new<F>(listof: F) -> Self
    where
        F: Fn() -> FormRef + Send + Sync + 'static,
    {
        Self {
            options: FieldOptions::default(),
            listof: Arc::new(listof),
        }
    }

    /// List of `T` items.
    #[must_use]
    pub fn of<T: Form>() -> Self {
        Self::new(FormRef::of::<T>)
    }
}

impl std::fmt::Debug for List {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("List")
            .field("options", &self.options)
            .field("listof", &(self.listof)().id())
            .finish()
    }
}

impl FieldAnnotation for List {
    fn annotate(self, form: &mut FormBuilder<'_>, key: &str) {
        let name = key.to_string();
        let options = self.options.clone();
        let listof = Arc::clone(&self.listof);
        form.describe(move |materializer| {
            let item = listof();
            Ok(Descriptor {
                listof: materializer.resolve(&item)?,
                max_length: options.max_length,
                min_length: options.min_length,
                widget: options.widget.clone(),
                ..options.descriptor(&name, FieldKind::List)
            })
        });

        let previous = form.existing_rule(key);
        let options = self.options;
        let listof = self.listof;
        form.constrain(key, move |compiler| {
            let base = match &previous {
                Some(producer) => producer(compiler),
                None if options.required => Rule::array().required(),
                None => Rule::array(),
            };
            let mut rule = match compiler.form_rule(&listof()) {
                Some(item) => base.items(item),
                None => base,
            };
            if let Some(n) = options.min_length {
                rule = rule.min_items(n);
            }
            if let Some(n) = options.max_length {
                rule = rule.max_items(n);
            }
            rule
        });
    }
}
