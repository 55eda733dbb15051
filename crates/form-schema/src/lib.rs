//! # form-schema
//!
//! Declarative form fields for formwork.
//!
//! This crate provides:
//! - [`Form`]: the static field-declaration block of a form type
//! - Field annotators ([`Input`], [`Select`], [`List`], [`Branch`], ...) that
//!   register a descriptor producer and a validation rule per field
//! - [`FormRegistry`]: per-form metadata, finalization, and the
//!   `ui_schema` / `validation_schema` queries
//! - [`FormInstance::validate`]: one asynchronous validation pass of an
//!   instance against its form's composite rule
//!
//! ## Architecture
//!
//! Descriptors are defined in `form-core`. Composite rules are plain JSON
//! Schema documents assembled here and evaluated by `jsonschema`; engine
//! settings come from `form-config`.
//!
//! ```
//! use form_schema::{Form, FormBuilder, FormRegistry, Input, Rule, SchemaError};
//!
//! struct Signup;
//!
//! impl Form for Signup {
//!     fn declare(form: &mut FormBuilder<'_>) -> Result<(), SchemaError> {
//!         form.field("name", Input::text().required())
//!             .validate(Rule::string().required());
//!         form.field("email", Input::email())
//!             .validate(Rule::string().email());
//!         Ok(())
//!     }
//! }
//!
//! let registry = FormRegistry::new();
//! let ui = registry.ui_schema_of::<Signup>().unwrap();
//! assert_eq!(ui.len(), 2);
//! let rule = registry.validation_schema_of::<Signup>().unwrap();
//! assert_eq!(rule["required"], serde_json::json!(["name"]));
//! ```

pub mod annotate;
mod builder;
mod compile;
pub mod error;
mod form;
mod materialize;
mod registry;
mod rule;
mod validate;

pub use annotate::{
    Branch, BranchFallback, BranchMap, BranchTarget, Custom, FieldAnnotation, FieldOptions, File,
    Input, List, Number, Radio, Select, SubSchema, Timestamp,
};
pub use builder::{FieldHandle, FormBuilder};
pub use compile::RuleCompiler;
pub use error::{SchemaError, Violation};
pub use form::{Form, FormId, FormRef};
pub use form_config::ValidationConfig;
pub use materialize::Materializer;
pub use registry::{DescriptorProducer, FormMetadata, FormRegistry, RuleProducer};
pub use rule::Rule;
pub use validate::{FormInstance, check, validate_value};
