//! Field annotators.
//!
//! Each annotator is configured with builder methods and then applied to a
//! field through [`FormBuilder::field`]. Applying it appends the field's
//! descriptor producer and, for kinds that validate by default, installs a
//! permissive rule that a later [`FieldHandle::validate`] can narrow.
//!
//! [`FieldHandle::validate`]: crate::FieldHandle::validate

mod branch;
mod choice;
mod input;
mod list;
mod plain;
mod subschema;

pub use branch::{Branch, BranchFallback, BranchMap, BranchTarget};
pub use choice::{Radio, Select};
pub use input::{Input, Number};
pub use list::List;
pub use plain::{Custom, File, Timestamp};
pub use subschema::SubSchema;

use form_core::{Descriptor, FieldKind};
use serde_json::Value;

use crate::builder::FormBuilder;

/// A configured annotation, ready to be applied to one field.
pub trait FieldAnnotation {
    /// Register this field's descriptor producer and default rule.
    fn annotate(self, form: &mut FormBuilder<'_>, key: &str);
}

/// Options shared by most annotators.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldOptions {
    pub required: bool,
    pub disabled: bool,
    pub default_value: Option<Value>,
    pub widget: Option<String>,
    pub placeholder: Option<String>,
    pub tooltip: Option<String>,
    pub max_length: Option<u64>,
    pub min_length: Option<u64>,
}

impl FieldOptions {
    /// Descriptor with `required`, `disabled` and `default` filled in.
    /// `default` falls back to the field key.
    fn descriptor(&self, key: &str, kind: FieldKind) -> Descriptor {
        Descriptor {
            required: Some(self.required),
            disabled: Some(self.disabled),
            default: Some(
                self.default_value
                    .clone()
                    .unwrap_or_else(|| Value::String(key.to_string())),
            ),
            ..Descriptor::new(key, kind)
        }
    }
}

/// Builder methods for annotators that embed `options: FieldOptions`.
macro_rules! field_options {
    ($ty:ty) => {
        impl $ty {
            #[must_use]
            pub fn required(mut self) -> Self {
                self.options.required = true;
                self
            }

            #[must_use]
            pub fn disabled(mut self) -> Self {
                self.options.disabled = true;
                self
            }

            #[must_use]
            pub fn default_value(mut self, value: impl Into<serde_json::Value>) -> Self {
                self.options.default_value = Some(value.into());
                self
            }

            #[must_use]
            pub fn widget(mut self, widget: impl Into<String>) -> Self {
                self.options.widget = Some(widget.into());
                self
            }

            #[must_use]
            pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
                self.options.placeholder = Some(placeholder.into());
                self
            }

            #[must_use]
            pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
                self.options.tooltip = Some(tooltip.into());
                self
            }

            #[must_use]
            pub fn max_length(mut self, n: u64) -> Self {
                self.options.max_length = Some(n);
                self
            }

            #[must_use]
            pub fn min_length(mut self, n: u64) -> Self {
                self.options.min_length = Some(n);
                self
            }

            #[must_use]
            pub const fn options(&self) -> &$crate::annotate::FieldOptions {
                &self.options
            }
        }
    };
}

pub(crate) use field_options;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_falls_back_to_key() {
        let d = FieldOptions::default().descriptor("name", FieldKind::Input);
        assert_eq!(d.default, Some(json!("name")));
        assert_eq!(d.required, Some(false));
        assert_eq!(d.disabled, Some(false));
    }

    #[test]
    fn explicit_default_wins() {
        let options = FieldOptions {
            default_value: Some(json!(3)),
            required: true,
            ..FieldOptions::default()
        };
        let d = options.descriptor("count", FieldKind::Input);
        assert_eq!(d.default, Some(json!(3)));
        assert!(d.is_required());
    }
}
