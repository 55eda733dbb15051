//! Per-form metadata and the registry that owns it.
//!
//! Each form has one [`FormMetadata`] record holding its descriptor
//! producers (one per field, declaration order) and its rule producers
//! (one per field key). A record is created on the first registration
//! against a form, frozen by [`FormRegistry::finalize`], and never removed.
//! Materialized schemas are not cached: every query re-runs the producers.

use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use form_core::{Descriptor, UiSchema};

use crate::builder::FormBuilder;
use crate::compile::RuleCompiler;
use crate::error::SchemaError;
use crate::form::{Form, FormId, FormRef};
use crate::materialize::Materializer;
use crate::rule::Rule;

/// Produces one field's descriptor when a UI schema is materialized.
pub type DescriptorProducer =
    Arc<dyn Fn(&mut Materializer<'_>) -> Result<Descriptor, SchemaError> + Send + Sync>;

/// Produces one field's rule when a composite rule is compiled.
pub type RuleProducer = Arc<dyn Fn(&mut RuleCompiler<'_>) -> Rule + Send + Sync>;

/// The field registrations of one form.
#[derive(Clone, Default)]
pub struct FormMetadata {
    producers: Vec<DescriptorProducer>,
    rules: Vec<(String, RuleProducer)>,
}

impl FormMetadata {
    /// Append a descriptor producer. Duplicate keys are not detected.
    pub fn register(&mut self, producer: DescriptorProducer) {
        self.producers.push(producer);
    }

    /// Store the rule for `key`, replacing any earlier one in place.
    pub fn register_rule(&mut self, key: impl Into<String>, producer: RuleProducer) {
        let key = key.into();
        match self.rules.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = producer,
            None => self.rules.push((key, producer)),
        }
    }

    #[must_use]
    pub fn rule(&self, key: &str) -> Option<RuleProducer> {
        self.rules
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, producer)| Arc::clone(producer))
    }

    /// Number of registered fields (descriptor producers).
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.producers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }

    pub(crate) fn producers(&self) -> &[DescriptorProducer] {
        &self.producers
    }

    pub(crate) fn rules(&self) -> &[(String, RuleProducer)] {
        &self.rules
    }

    /// Append another form's registrations after this one's.
    pub(crate) fn extend(&mut self, other: &Self) {
        self.producers.extend(other.producers.iter().cloned());
        for (key, producer) in &other.rules {
            self.register_rule(key.clone(), Arc::clone(producer));
        }
    }
}

enum FormState {
    Open(FormMetadata),
    Finalized(Arc<FormMetadata>),
}

/// Store of every form's metadata, keyed by form identity.
///
/// Usable as an owned value (tests, embedded use) or process-wide through
/// [`FormRegistry::global`].
#[derive(Default)]
pub struct FormRegistry {
    forms: RwLock<HashMap<FormId, FormState>>,
}

static GLOBAL: LazyLock<FormRegistry> = LazyLock::new(FormRegistry::new);

thread_local! {
    /// Forms whose `declare` is running on this thread, outermost first.
    static DECLARING: RefCell<Vec<FormId>> = const { RefCell::new(Vec::new()) };
}

/// Marks a form as being declared on this thread until dropped.
struct Declaring;

impl Declaring {
    fn enter(form: FormId) -> Result<Self, SchemaError> {
        DECLARING.with_borrow_mut(|stack| {
            if let Some(start) = stack.iter().position(|id| *id == form) {
                let path = stack[start..]
                    .iter()
                    .chain(std::iter::once(&form))
                    .map(|id| id.short_name().to_string())
                    .collect();
                return Err(SchemaError::RecursiveForm { path });
            }
            stack.push(form);
            Ok(Self)
        })
    }
}

impl Drop for Declaring {
    fn drop(&mut self) {
        DECLARING.with_borrow_mut(|stack| {
            stack.pop();
        });
    }
}

impl FormRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<FormId, FormState>> {
        self.forms.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<FormId, FormState>> {
        self.forms.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a descriptor producer to `form`, creating its record if absent.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::AlreadyFinalized` if `form` is frozen.
    pub fn register(&self, form: FormId, producer: DescriptorProducer) -> Result<(), SchemaError> {
        self.with_open(form, |metadata| metadata.register(producer))
    }

    /// Store the rule producer for `key` on `form`, overwriting any earlier one.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::AlreadyFinalized` if `form` is frozen.
    pub fn register_rule(
        &self,
        form: FormId,
        key: impl Into<String>,
        producer: RuleProducer,
    ) -> Result<(), SchemaError> {
        self.with_open(form, |metadata| metadata.register_rule(key, producer))
    }

    fn with_open(
        &self,
        form: FormId,
        apply: impl FnOnce(&mut FormMetadata),
    ) -> Result<(), SchemaError> {
        let mut forms = self.write();
        match forms
            .entry(form)
            .or_insert_with(|| FormState::Open(FormMetadata::default()))
        {
            FormState::Open(metadata) => {
                apply(metadata);
                Ok(())
            }
            FormState::Finalized(_) => Err(SchemaError::AlreadyFinalized {
                form: form.name().to_string(),
            }),
        }
    }

    /// The current rule producer for `key` on `form`, if any.
    #[must_use]
    pub fn rule(&self, form: FormId, key: &str) -> Option<RuleProducer> {
        match self.read().get(&form)? {
            FormState::Open(metadata) => metadata.rule(key),
            FormState::Finalized(metadata) => metadata.rule(key),
        }
    }

    /// Whether any field was ever registered for `form`.
    #[must_use]
    pub fn is_schema_class(&self, form: FormId) -> bool {
        self.read().contains_key(&form)
    }

    #[must_use]
    pub fn is_finalized(&self, form: FormId) -> bool {
        matches!(self.read().get(&form), Some(FormState::Finalized(_)))
    }

    /// Number of fields registered for `form` (0 if unknown).
    #[must_use]
    pub fn field_count(&self, form: FormId) -> usize {
        match self.read().get(&form) {
            Some(FormState::Open(metadata)) => metadata.field_count(),
            Some(FormState::Finalized(metadata)) => metadata.field_count(),
            None => 0,
        }
    }

    /// Names of all finalized forms, sorted.
    #[must_use]
    pub fn forms(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .read()
            .iter()
            .filter(|(_, state)| matches!(state, FormState::Finalized(_)))
            .map(|(id, _)| id.name())
            .collect();
        names.sort_unstable();
        names
    }

    /// Freeze `form`'s metadata. Calling it again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NoFields` if no field was registered for `form`.
    pub fn finalize(&self, form: FormId) -> Result<(), SchemaError> {
        finalize_in(&mut self.write(), form)
    }

    /// Declare and finalize `T`. No-op if `T` is already finalized.
    ///
    /// Fields are declared into a scratch record, then merged and frozen
    /// under one write lock. A failing `declare` leaves the registry
    /// untouched, and concurrent registrations of the same form install
    /// its fields exactly once.
    ///
    /// # Errors
    ///
    /// Propagates errors from `T::declare`, returns `SchemaError::NoFields`
    /// if `T` declares no fields, and `SchemaError::RecursiveForm` if
    /// declaring `T` includes `T` again (directly or through other forms).
    pub fn register_form<T: Form>(&self) -> Result<(), SchemaError> {
        let form = FormId::of::<T>();
        if self.is_finalized(form) {
            return Ok(());
        }
        let declaring = Declaring::enter(form)?;
        let mut builder = FormBuilder::new(self, form);
        T::declare(&mut builder)?;
        drop(declaring);
        self.install(form, builder.into_metadata())
    }

    fn install(&self, form: FormId, declared: FormMetadata) -> Result<(), SchemaError> {
        let mut forms = self.write();
        match forms.entry(form) {
            Entry::Occupied(entry) => match entry.into_mut() {
                // Another thread registered the same form first.
                FormState::Finalized(_) => return Ok(()),
                FormState::Open(metadata) => metadata.extend(&declared),
            },
            Entry::Vacant(entry) => {
                if declared.is_empty() {
                    return Err(no_fields(form));
                }
                entry.insert(FormState::Open(declared));
            }
        }
        finalize_in(&mut forms, form)
    }

    /// Resolve a deferred reference, registering the form on first use.
    ///
    /// `Ok(None)` means the reference names a type that is not
    /// schema-bearing.
    pub(crate) fn try_resolve(
        &self,
        form: &FormRef,
    ) -> Result<Option<Arc<FormMetadata>>, SchemaError> {
        if let Some(metadata) = self.finalized(form.id()) {
            return Ok(Some(metadata));
        }
        let Some(registrar) = form.registrar() else {
            return Ok(None);
        };
        registrar(self)?;
        Ok(self.finalized(form.id()))
    }

    /// Frozen metadata of `form`, if finalized.
    pub(crate) fn finalized(&self, form: FormId) -> Option<Arc<FormMetadata>> {
        match self.read().get(&form)? {
            FormState::Finalized(metadata) => Some(Arc::clone(metadata)),
            FormState::Open(_) => None,
        }
    }

    /// Resolve a deferred reference, registering the form on first use.
    ///
    /// Forms that cannot be registered are treated as not schema-bearing.
    pub(crate) fn resolve(&self, form: &FormRef) -> Option<Arc<FormMetadata>> {
        self.try_resolve(form).unwrap_or_else(|error| {
            tracing::warn!(
                form = form.id().name(),
                %error,
                "referenced form could not be registered; treating it as unconstrained"
            );
            None
        })
    }

    fn require(&self, form: FormId) -> Result<Arc<FormMetadata>, SchemaError> {
        self.finalized(form)
            .ok_or_else(|| SchemaError::NotSchemaClass {
                form: form.name().to_string(),
            })
    }

    /// Materialize the UI schema of a finalized form.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotSchemaClass` if `form` is not finalized, or
    /// `SchemaError::RecursiveForm` if the form embeds itself.
    pub fn ui_schema(&self, form: FormId) -> Result<UiSchema, SchemaError> {
        let metadata = self.require(form)?;
        Materializer::new(self).form(form, &metadata)
    }

    /// Register `T` if needed and materialize its UI schema.
    ///
    /// # Errors
    ///
    /// See [`Self::register_form`] and [`Self::ui_schema`].
    pub fn ui_schema_of<T: Form>(&self) -> Result<UiSchema, SchemaError> {
        self.register_form::<T>()?;
        self.ui_schema(FormId::of::<T>())
    }

    /// Compile the composite rule of a finalized form into one JSON Schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotSchemaClass` if `form` is not finalized.
    pub fn validation_schema(&self, form: FormId) -> Result<serde_json::Value, SchemaError> {
        let metadata = self.require(form)?;
        Ok(RuleCompiler::new(self, form).compile(&metadata))
    }

    /// Register `T` if needed and compile its composite rule.
    ///
    /// # Errors
    ///
    /// See [`Self::register_form`] and [`Self::validation_schema`].
    pub fn validation_schema_of<T: Form>(&self) -> Result<serde_json::Value, SchemaError> {
        self.register_form::<T>()?;
        self.validation_schema(FormId::of::<T>())
    }
}

/// Freeze `form` inside an already held write lock.
fn finalize_in(forms: &mut HashMap<FormId, FormState>, form: FormId) -> Result<(), SchemaError> {
    let state = forms.get_mut(&form).ok_or_else(|| no_fields(form))?;
    let FormState::Open(metadata) = &mut *state else {
        return Ok(());
    };
    if metadata.is_empty() {
        return Err(no_fields(form));
    }
    let metadata = std::mem::take(metadata);
    tracing::debug!(
        form = form.name(),
        fields = metadata.field_count(),
        "finalized form"
    );
    *state = FormState::Finalized(Arc::new(metadata));
    Ok(())
}

fn no_fields(form: FormId) -> SchemaError {
    SchemaError::NoFields {
        form: form.name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_core::FieldKind;

    struct Manual;
    struct Empty;

    fn producer(key: &'static str) -> DescriptorProducer {
        Arc::new(move |_| Ok(Descriptor::new(key, FieldKind::Input)))
    }

    fn rule(rule: Rule) -> RuleProducer {
        Arc::new(move |_| rule.clone())
    }

    #[test]
    fn register_creates_record_lazily() {
        let registry = FormRegistry::new();
        let form = FormId::of::<Manual>();
        assert!(!registry.is_schema_class(form));

        registry.register(form, producer("a")).unwrap();
        assert!(registry.is_schema_class(form));
        assert!(!registry.is_finalized(form));
        assert_eq!(registry.field_count(form), 1);
    }

    #[test]
    fn finalize_without_fields_fails() {
        let registry = FormRegistry::new();
        let result = registry.finalize(FormId::of::<Empty>());
        assert!(matches!(result, Err(SchemaError::NoFields { .. })));
    }

    #[test]
    fn finalize_is_idempotent_and_freezes() {
        let registry = FormRegistry::new();
        let form = FormId::of::<Manual>();
        registry.register(form, producer("a")).unwrap();
        registry.finalize(form).unwrap();
        registry.finalize(form).unwrap();

        assert_eq!(registry.field_count(form), 1);
        assert!(matches!(
            registry.register(form, producer("b")),
            Err(SchemaError::AlreadyFinalized { .. })
        ));
        assert_eq!(registry.forms(), vec![form.name()]);
    }

    #[test]
    fn rule_registration_is_last_wins_in_place() {
        let mut metadata = FormMetadata::default();
        metadata.register_rule("a", rule(Rule::any()));
        metadata.register_rule("b", rule(Rule::any()));
        metadata.register_rule("a", rule(Rule::string().required()));

        let keys: Vec<&str> = metadata.rules().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);

        let registry = FormRegistry::new();
        let compiled = (metadata.rule("a").unwrap())(&mut RuleCompiler::new(
            &registry,
            FormId::of::<Manual>(),
        ));
        assert!(compiled.is_required());
    }

    #[test]
    fn queries_on_unknown_form_fail() {
        let registry = FormRegistry::new();
        let form = FormId::of::<Empty>();
        assert!(matches!(
            registry.ui_schema(form),
            Err(SchemaError::NotSchemaClass { .. })
        ));
        assert!(matches!(
            registry.validation_schema(form),
            Err(SchemaError::NotSchemaClass { .. })
        ));
    }

    #[test]
    fn declaring_guard_detects_reentry_and_unwinds() {
        let outer = FormId::of::<Manual>();
        let inner = FormId::of::<Empty>();
        {
            let _outer = Declaring::enter(outer).unwrap();
            let _inner = Declaring::enter(inner).unwrap();
            match Declaring::enter(outer) {
                Err(SchemaError::RecursiveForm { path }) => {
                    assert_eq!(path, vec!["Manual", "Empty", "Manual"]);
                }
                _ => panic!("expected RecursiveForm"),
            }
        }
        assert!(Declaring::enter(outer).is_ok());
    }

    #[test]
    fn open_form_is_not_queryable() {
        let registry = FormRegistry::new();
        let form = FormId::of::<Manual>();
        registry.register(form, producer("a")).unwrap();
        assert!(registry.ui_schema(form).is_err());
        registry.finalize(form).unwrap();
        assert_eq!(registry.ui_schema(form).unwrap().len(), 1);
    }
}
