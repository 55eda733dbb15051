//! Select and radio fields.

use form_core::{Descriptor, FieldKind, SelectOption};
use serde_json::Value;

use super::{FieldAnnotation, FieldOptions, field_options};
use crate::builder::FormBuilder;
use crate::rule::Rule;

/// A dropdown over a fixed set of options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Select {
    options: FieldOptions,
    choices: Vec<SelectOption>,
}

/// A radio group over a fixed set of options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Radio {
    options: FieldOptions,
    choices: Vec<SelectOption>,
}

field_options!(Select);
field_options!(Radio);

impl Select {
    #[must_use]
    pub fn new(choices: impl IntoIterator<Item = SelectOption>) -> Self {
        Self {
            options: FieldOptions::default(),
            choices: choices.into_iter().collect(),
        }
    }
}

impl Radio {
    #[must_use]
    pub fn new(choices: impl IntoIterator<Item = SelectOption>) -> Self {
        Self {
            options: FieldOptions::default(),
            choices: choices.into_iter().collect(),
        }
    }
}

impl FieldAnnotation for Select {
    fn annotate(self, form: &mut FormBuilder<'_>, key: &str) {
        annotate_choice(form, key, FieldKind::Select, self.options, self.choices);
    }
}

impl FieldAnnotation for Radio {
    fn annotate(self, form: &mut FormBuilder<'_>, key: &str) {
        annotate_choice(form, key, FieldKind::Radio, self.options, self.choices);
    }
}

/// Shared by select and radio: the rule narrows whatever rule the field
/// already has to the option values.
fn annotate_choice(
    form: &mut FormBuilder<'_>,
    key: &str,
    kind: FieldKind,
    options: FieldOptions,
    choices: Vec<SelectOption>,
) {
    let values: Vec<Value> = choices.iter().map(|choice| choice.value.clone()).collect();
    let required = options.required;
    let name = key.to_string();
    form.describe(move |_| {
        Ok(Descriptor {
            options: Some(choices.clone()),
            ..options.descriptor(&name, kind)
        })
    });

    let previous = form.existing_rule(key);
    form.constrain(key, move |compiler| {
        let base = match &previous {
            Some(producer) => producer(compiler),
            None if required => Rule::any().required(),
            None => Rule::any(),
        };
        if values.is_empty() {
            base
        } else {
            base.allow_only(values.iter().cloned())
        }
    });
}
