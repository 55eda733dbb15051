//! Form identity and deferred form references.

use std::any::TypeId;
use std::fmt;

use crate::builder::FormBuilder;
use crate::error::SchemaError;
use crate::registry::FormRegistry;

/// A Rust type that declares form fields.
///
/// `declare` is the form's field-declaration block: it applies one
/// annotation per field, in the order the fields should be rendered.
///
/// ```
/// use form_schema::{Form, FormBuilder, Input, Rule, SchemaError};
///
/// struct Login;
///
/// impl Form for Login {
///     fn declare(form: &mut FormBuilder<'_>) -> Result<(), SchemaError> {
///         form.field("user", Input::text().required())
///             .validate(Rule::string().required());
///         form.field("password", Input::text());
///         Ok(())
///     }
/// }
/// ```
pub trait Form: 'static {
    /// Apply field annotations.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`FormBuilder::include`].
    fn declare(form: &mut FormBuilder<'_>) -> Result<(), SchemaError>;
}

/// Identity of a form class: the `TypeId` of the type that stands for it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormId {
    type_id: TypeId,
    name: &'static str,
}

impl FormId {
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Full type path, e.g. `my_app::forms::Login`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.name
    }

    /// Last path segment of the type name, e.g. `Login`.
    #[must_use]
    pub fn short_name(self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl fmt::Debug for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FormId({})", self.name)
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

type Registrar = fn(&FormRegistry) -> Result<(), SchemaError>;

/// A deferred reference to a form, resolved only when a schema is
/// materialized. This is what lets forms reference each other regardless
/// of declaration order.
#[derive(Clone, Copy, Debug)]
pub struct FormRef {
    id: FormId,
    registrar: Option<Registrar>,
}

impl FormRef {
    /// Reference a form type. It is registered on first resolution.
    #[must_use]
    pub fn of<T: Form>() -> Self {
        Self {
            id: FormId::of::<T>(),
            registrar: Some(FormRegistry::register_form::<T> as Registrar),
        }
    }

    /// Reference a type that does not declare fields itself. It resolves
    /// only if someone registered fields for it manually.
    #[must_use]
    pub fn opaque<T: ?Sized + 'static>() -> Self {
        Self {
            id: FormId::of::<T>(),
            registrar: None,
        }
    }

    #[must_use]
    pub const fn id(&self) -> FormId {
        self.id
    }

    pub(crate) const fn registrar(&self) -> Option<Registrar> {
        self.registrar
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod shapes {
        pub struct Circle;
        pub struct Wrapper<T>(pub T);
    }

    #[test]
    fn short_name_strips_path() {
        assert_eq!(FormId::of::<shapes::Circle>().short_name(), "Circle");
        assert_eq!(
            FormId::of::<shapes::Wrapper<shapes::Circle>>().short_name(),
            "Wrapper"
        );
    }

    #[test]
    fn identity_is_by_type() {
        assert_eq!(FormId::of::<shapes::Circle>(), FormId::of::<shapes::Circle>());
        assert_ne!(FormId::of::<shapes::Circle>(), FormId::of::<String>());
        assert!(FormId::of::<shapes::Circle>().name().ends_with("Circle"));
    }

    #[test]
    fn opaque_ref_has_no_registrar() {
        let r = FormRef::opaque::<String>();
        assert!(r.registrar().is_none());
        assert_eq!(r.id(), FormId::of::<String>());
    }
}
