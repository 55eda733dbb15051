//! Fields that only describe rendering: custom widgets, timestamps, files.
//! None of them registers a rule; attach one with `validate` if needed.

use form_core::{Descriptor, FieldKind};

use super::{FieldAnnotation, FieldOptions, field_options};
use crate::builder::FormBuilder;

/// A field rendered by a named custom widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Custom {
    widget: String,
}

impl Custom {
    #[must_use]
    pub fn new(widget: impl Into<String>) -> Self {
        Self {
            widget: widget.into(),
        }
    }
}

impl FieldAnnotation for Custom {
    fn annotate(self, form: &mut FormBuilder<'_>, key: &str) {
        let name = key.to_string();
        form.describe(move |_| {
            Ok(Descriptor {
                widget: Some(self.widget.clone()),
                ..Descriptor::new(name.clone(), FieldKind::Custom)
            })
        });
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timestamp {
    options: FieldOptions,
}

field_options!(Timestamp);

impl Timestamp {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl FieldAnnotation for Timestamp {
    fn annotate(self, form: &mut FormBuilder<'_>, key: &str) {
        let name = key.to_string();
        form.describe(move |_| Ok(self.options.descriptor(&name, FieldKind::Timestamp)));
    }
}

/// A file upload field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct File {
    options: FieldOptions,
    file_types: Vec<String>,
    upload_url: Option<String>,
}

field_options!(File);

impl File {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepted MIME types or extensions.
    #[must_use]
    pub fn file_types<S: Into<String>>(mut self, types: impl IntoIterator<Item = S>) -> Self {
        self.file_types = types.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn upload_url(mut self, url: impl Into<String>) -> Self {
        self.upload_url = Some(url.into());
        self
    }
}

impl FieldAnnotation for File {
    fn annotate(self, form: &mut FormBuilder<'_>, key: &str) {
        let name = key.to_string();
        form.describe(move |_| {
            Ok(Descriptor {
                widget: self.options.widget.clone(),
                file_types: (!self.file_types.is_empty()).then(|| self.file_types.clone()),
                upload_url: self.upload_url.clone(),
                ..self.options.descriptor(&name, FieldKind::File)
            })
        });
    }
}
