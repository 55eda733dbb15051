//! Plain and numeric input fields.

use form_core::{FieldKind, InputType};

use super::{FieldAnnotation, FieldOptions, field_options};
use crate::builder::FormBuilder;
use crate::rule::Rule;

/// A plain input. Installs an any-value rule, required only if the input
/// is marked required, unless the field already has one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Input {
    options: FieldOptions,
    dtype: InputType,
}

field_options!(Input);

impl Input {
    #[must_use]
    pub fn new(dtype: InputType) -> Self {
        Self {
            options: FieldOptions::default(),
            dtype,
        }
    }

    #[must_use]
    pub fn text() -> Self {
        Self::new(InputType::Text)
    }

    #[must_use]
    pub fn email() -> Self {
        Self::new(InputType::Email)
    }

    #[must_use]
    pub fn number() -> Self {
        Self::new(InputType::Number)
    }
}

impl FieldAnnotation for Input {
    fn annotate(self, form: &mut FormBuilder<'_>, key: &str) {
        let name = key.to_string();
        let required = self.options.required;
        form.describe(move |_| {
            let options = &self.options;
            Ok(form_core::Descriptor {
                input_type: Some(self.dtype),
                max_length: options.max_length,
                min_length: options.min_length,
                widget: options.widget.clone(),
                placeholder: options.placeholder.clone(),
                tooltip: options.tooltip.clone(),
                ..options.descriptor(&name, FieldKind::Input)
            })
        });
        if form.existing_rule(key).is_none() {
            form.constrain(key, move |_| {
                if required {
                    Rule::any().required()
                } else {
                    Rule::any()
                }
            });
        }
    }
}

/// A numeric input: an `input` descriptor with `input_type = number`.
/// Registers no rule of its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Number {
    options: FieldOptions,
}

field_options!(Number);

impl Number {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl FieldAnnotation for Number {
    fn annotate(self, form: &mut FormBuilder<'_>, key: &str) {
        let name = key.to_string();
        form.describe(move |_| {
            let options = &self.options;
            Ok(form_core::Descriptor {
                input_type: Some(InputType::Number),
                max_length: options.max_length,
                min_length: options.min_length,
                widget: options.widget.clone(),
                ..options.descriptor(&name, FieldKind::Input)
            })
        });
    }
}
