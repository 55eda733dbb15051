//! UI schema materialization and registry lifecycle for declared forms.

use form_core::{FieldKind, InputType, SelectOption};
use form_schema::{
    Branch, BranchTarget, Custom, File, Form, FormBuilder, FormId, FormRef, FormRegistry, Input,
    List, Number, Radio, Rule, SchemaError, Select, SubSchema, Timestamp,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

struct Address;

impl Form for Address {
    fn declare(form: &mut FormBuilder<'_>) -> Result<(), SchemaError> {
        form.field("street", Input::text().required())
            .validate(Rule::string().required());
        form.field("city", Input::text().placeholder("City"));
        Ok(())
    }
}

struct Profile;

impl Form for Profile {
    fn declare(form: &mut FormBuilder<'_>) -> Result<(), SchemaError> {
        form.field("name", Input::text().required().max_length(64));
        form.field("age", Number::new());
        form.field("avatar", Custom::new("avatar-picker"));
        form.field("born", Timestamp::new());
        form.field(
            "role",
            Select::new([SelectOption::new("admin", "Admin"), SelectOption::new("user", "User")]),
        );
        form.field(
            "plan",
            Radio::new([SelectOption::new("free", "Free"), SelectOption::new("pro", "Pro")]),
        );
        form.field(
            "resume",
            File::new().file_types(["application/pdf"]).upload_url("/upload"),
        );
        form.field("addresses", List::of::<Address>().min_length(1));
        form.field("home", SubSchema::of::<Address>());
        Ok(())
    }
}

struct Empty;

impl Form for Empty {
    fn declare(_form: &mut FormBuilder<'_>) -> Result<(), SchemaError> {
        Ok(())
    }
}

struct Tree;

impl Form for Tree {
    fn declare(form: &mut FormBuilder<'_>) -> Result<(), SchemaError> {
        form.field("label", Input::text());
        form.field("children", List::of::<Tree>());
        Ok(())
    }
}

struct Base;

impl Form for Base {
    fn declare(form: &mut FormBuilder<'_>) -> Result<(), SchemaError> {
        form.field("id", Input::text().disabled());
        Ok(())
    }
}

struct Extended;

impl Form for Extended {
    fn declare(form: &mut FormBuilder<'_>) -> Result<(), SchemaError> {
        form.include(FormRef::of::<Base>())?;
        form.field("note", Input::text());
        Ok(())
    }
}

struct IncludesString;

impl Form for IncludesString {
    fn declare(form: &mut FormBuilder<'_>) -> Result<(), SchemaError> {
        form.field("note", Input::text());
        form.include(FormRef::opaque::<String>())
    }
}

struct SelfIncluding;

impl Form for SelfIncluding {
    fn declare(form: &mut FormBuilder<'_>) -> Result<(), SchemaError> {
        form.field("note", Input::text());
        form.include(FormRef::of::<SelfIncluding>())
    }
}

struct Left;

impl Form for Left {
    fn declare(form: &mut FormBuilder<'_>) -> Result<(), SchemaError> {
        form.include(FormRef::of::<Right>())?;
        form.field("left", Input::text());
        Ok(())
    }
}

struct Right;

impl Form for Right {
    fn declare(form: &mut FormBuilder<'_>) -> Result<(), SchemaError> {
        form.include(FormRef::of::<Left>())?;
        form.field("right", Input::text());
        Ok(())
    }
}

#[derive(schemars::JsonSchema)]
#[allow(dead_code)]
struct Coords {
    lat: f64,
    lon: f64,
}

struct Shipment;

impl Form for Shipment {
    fn declare(form: &mut FormBuilder<'_>) -> Result<(), SchemaError> {
        form.field("kind", Input::text());
        form.field(
            "payload",
            Branch::new("kind", || {
                vec![
                    ("address".to_string(), BranchTarget::form::<Address>()),
                    ("geo".to_string(), BranchTarget::typed::<Coords>()),
                    ("address".to_string(), BranchTarget::form::<Tree>()),
                ]
            }),
        );
        Ok(())
    }
}

fn keys(registry: &FormRegistry) -> Vec<String> {
    registry
        .ui_schema_of::<Profile>()
        .unwrap()
        .into_iter()
        .map(|d| d.key)
        .collect()
}

#[test]
fn descriptors_follow_declaration_order() {
    let registry = FormRegistry::new();
    assert_eq!(
        keys(&registry),
        vec![
            "name", "age", "avatar", "born", "role", "plan", "resume", "addresses", "home"
        ]
    );
}

#[rstest]
#[case(0, FieldKind::Input)]
#[case(1, FieldKind::Input)]
#[case(2, FieldKind::Custom)]
#[case(3, FieldKind::Timestamp)]
#[case(4, FieldKind::Select)]
#[case(5, FieldKind::Radio)]
#[case(6, FieldKind::File)]
#[case(7, FieldKind::List)]
#[case(8, FieldKind::Subtype)]
fn descriptor_kinds(#[case] index: usize, #[case] kind: FieldKind) {
    let registry = FormRegistry::new();
    let ui = registry.ui_schema_of::<Profile>().unwrap();
    assert_eq!(ui[index].kind, kind);
}

#[test]
fn descriptor_attributes_are_carried() {
    let registry = FormRegistry::new();
    let ui = registry.ui_schema_of::<Profile>().unwrap();

    assert_eq!(ui[0].required, Some(true));
    assert_eq!(ui[0].max_length, Some(64));
    assert_eq!(ui[0].default, Some(json!("name")));
    assert_eq!(ui[1].input_type, Some(InputType::Number));
    assert_eq!(ui[2].widget.as_deref(), Some("avatar-picker"));
    assert_eq!(ui[2].required, None);
    assert_eq!(ui[4].options.as_ref().map(Vec::len), Some(2));
    assert_eq!(ui[6].file_types, Some(vec!["application/pdf".to_string()]));
    assert_eq!(ui[6].upload_url.as_deref(), Some("/upload"));
}

#[test]
fn list_descriptor_embeds_item_schema() {
    let registry = FormRegistry::new();
    let ui = registry.ui_schema_of::<Profile>().unwrap();
    let item_fields = registry.field_count(FormId::of::<Address>());

    let listof = ui[7].listof.as_ref().unwrap();
    assert_eq!(listof.len(), item_fields);
    assert_eq!(listof.len(), 2);
    assert_eq!(listof[0].key, "street");
    assert_eq!(ui[7].min_length, Some(1));
}

#[test]
fn subschema_descriptor_embeds_nested_schema() {
    let registry = FormRegistry::new();
    let ui = registry.ui_schema_of::<Profile>().unwrap();
    let nested = ui[8].schema.as_ref().unwrap();
    assert_eq!(nested.len(), 2);
    assert_eq!(nested[1].placeholder.as_deref(), Some("City"));
}

#[test]
fn finalizing_without_fields_fails() {
    let registry = FormRegistry::new();
    let err = registry.register_form::<Empty>().unwrap_err();
    assert!(matches!(err, SchemaError::NoFields { .. }));
    assert!(err.to_string().contains("Form with no fields"));
    assert!(!registry.is_schema_class(FormId::of::<Empty>()));
}

#[test]
fn queries_are_idempotent() {
    let registry = FormRegistry::new();
    registry.register_form::<Profile>().unwrap();
    registry.register_form::<Profile>().unwrap();
    registry.finalize(FormId::of::<Profile>()).unwrap();

    let form = FormId::of::<Profile>();
    assert_eq!(registry.field_count(form), 9);
    assert_eq!(registry.ui_schema(form).unwrap(), registry.ui_schema(form).unwrap());
    assert_eq!(
        registry.validation_schema(form).unwrap(),
        registry.validation_schema(form).unwrap()
    );
    assert_eq!(registry.field_count(form), 9);
}

#[test]
fn unregistered_form_is_not_queryable() {
    let registry = FormRegistry::new();
    let err = registry.ui_schema(FormId::of::<Address>()).unwrap_err();
    assert!(matches!(err, SchemaError::NotSchemaClass { .. }));
}

#[test]
fn recursive_ui_schema_is_an_error() {
    let registry = FormRegistry::new();
    let err = registry.ui_schema_of::<Tree>().unwrap_err();
    match err {
        SchemaError::RecursiveForm { path } => assert_eq!(path, vec!["Tree", "Tree"]),
        other => panic!("expected RecursiveForm, got {other:?}"),
    }
}

#[test]
fn include_copies_fields_first() {
    let registry = FormRegistry::new();
    let ui = registry.ui_schema_of::<Extended>().unwrap();
    let keys: Vec<&str> = ui.iter().map(|d| d.key.as_str()).collect();
    assert_eq!(keys, vec!["id", "note"]);
    assert_eq!(ui[0].disabled, Some(true));
}

#[test]
fn include_of_non_form_fails() {
    let registry = FormRegistry::new();
    let err = registry.register_form::<IncludesString>().unwrap_err();
    assert!(matches!(err, SchemaError::NotSchemaClass { .. }));
    assert!(!registry.is_finalized(FormId::of::<IncludesString>()));
}

#[test]
fn including_itself_is_an_error() {
    let registry = FormRegistry::new();
    let err = registry.register_form::<SelfIncluding>().unwrap_err();
    match err {
        SchemaError::RecursiveForm { path } => {
            assert_eq!(path, vec!["SelfIncluding", "SelfIncluding"]);
        }
        other => panic!("expected RecursiveForm, got {other:?}"),
    }
    assert!(!registry.is_schema_class(FormId::of::<SelfIncluding>()));
}

#[test]
fn mutual_includes_are_an_error() {
    let registry = FormRegistry::new();
    let err = registry.ui_schema_of::<Left>().unwrap_err();
    match err {
        SchemaError::RecursiveForm { path } => assert_eq!(path, vec!["Left", "Right", "Left"]),
        other => panic!("expected RecursiveForm, got {other:?}"),
    }
    assert!(!registry.is_finalized(FormId::of::<Left>()));
    assert!(!registry.is_finalized(FormId::of::<Right>()));

    // The failed attempt leaves nothing behind on this thread.
    let err = registry.register_form::<Right>().unwrap_err();
    match err {
        SchemaError::RecursiveForm { path } => assert_eq!(path, vec!["Right", "Left", "Right"]),
        other => panic!("expected RecursiveForm, got {other:?}"),
    }
}

#[test]
fn branch_descriptor_resolves_each_branch() {
    let registry = FormRegistry::new();
    let ui = registry.ui_schema_of::<Shipment>().unwrap();
    let branch = &ui[1];

    assert_eq!(branch.kind, FieldKind::Branch);
    assert_eq!(branch.branch_key.as_deref(), Some("kind"));
    assert_eq!(branch.required, Some(true));
    let branches = branch.branches.as_ref().unwrap();
    assert_eq!(branches.len(), 2);
    let order: Vec<&str> = branches.keys().map(String::as_str).collect();
    assert_eq!(order, vec!["address", "geo"]);
    // The first "address" entry wins over the later duplicate.
    assert_eq!(branches["address"].as_ref().map(Vec::len), Some(2));
    assert_eq!(branches["geo"], None);
}

#[test]
fn registry_lists_finalized_forms() {
    let registry = FormRegistry::new();
    registry.register_form::<Profile>().unwrap();
    let forms = registry.forms();
    // Address is registered lazily only once a schema is materialized.
    assert_eq!(forms, vec![FormId::of::<Profile>().name()]);

    registry.ui_schema_of::<Profile>().unwrap();
    assert_eq!(registry.forms().len(), 2);
}

#[test]
fn ui_schema_serializes_sparsely() {
    let registry = FormRegistry::new();
    let ui = registry.ui_schema_of::<Address>().unwrap();
    let value = serde_json::to_value(&ui).unwrap();
    assert_eq!(
        value[0],
        json!({
            "key": "street",
            "type": "input",
            "required": true,
            "disabled": false,
            "default": "street",
            "input_type": "text"
        })
    );
}
