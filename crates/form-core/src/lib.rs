//! # form-core
//!
//! Rendering-layer contract for formwork.
//!
//! A form's UI schema is an ordered list of [`Descriptor`]s, one per
//! declared field, in declaration order. Renderers consume this shape as
//! JSON; every type here derives `Serialize`, `Deserialize` and
//! `JsonSchema` so the contract itself can be exported with
//! [`descriptor_schema`].

pub mod descriptor;
pub mod enums;
pub mod errors;

pub use descriptor::{BranchSchemas, Descriptor, SelectOption, UiSchema, descriptor_schema};
pub use enums::{FieldKind, InputType};
pub use errors::CoreError;
