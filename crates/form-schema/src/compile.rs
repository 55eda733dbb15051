//! Composite rule compilation.
//!
//! A form compiles to one object schema. Forms it references (list items,
//! sub-schemas, branch targets) are compiled once into `$defs` and pointed
//! at with `$ref`; the root form is `#`. Recursive forms therefore compile
//! to a finite document.

use std::collections::HashMap;

use schemars::{Schema, json_schema};
use serde_json::{Map, Value, json};

use crate::form::{FormId, FormRef};
use crate::registry::{FormMetadata, FormRegistry};
use crate::rule::Rule;

/// Compiles rule producers into one JSON Schema document.
pub struct RuleCompiler<'r> {
    registry: &'r FormRegistry,
    root: FormId,
    defs: Map<String, Value>,
    names: HashMap<FormId, String>,
}

impl<'r> RuleCompiler<'r> {
    pub(crate) fn new(registry: &'r FormRegistry, root: FormId) -> Self {
        Self {
            registry,
            root,
            defs: Map::new(),
            names: HashMap::new(),
        }
    }

    pub(crate) fn compile(mut self, metadata: &FormMetadata) -> Value {
        let mut schema = self.object_schema(self.root, metadata);
        if !self.defs.is_empty() {
            schema.insert("$defs".to_string(), Value::Object(self.defs));
        }
        Value::Object(schema)
    }

    fn object_schema(&mut self, form: FormId, metadata: &FormMetadata) -> Map<String, Value> {
        let mut properties = Map::new();
        let mut required = Vec::new();
        let mut all_of = Vec::new();

        for (key, producer) in metadata.rules() {
            let (schema, is_required, conditions) = producer(self).into_parts();
            if is_required {
                required.push(Value::String(key.clone()));
            }
            all_of.extend(conditions);
            properties.insert(key.clone(), schema);
        }

        let mut schema = Map::new();
        schema.insert("title".to_string(), json!(form.short_name()));
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".to_string(), Value::Array(required));
        }
        if !all_of.is_empty() {
            schema.insert("allOf".to_string(), Value::Array(all_of));
        }
        schema
    }

    /// Optional rule pointing at a referenced form's composite rule, or
    /// `None` if the form is not schema-bearing.
    pub fn form_rule(&mut self, form: &FormRef) -> Option<Rule> {
        let id = form.id();
        if id == self.root {
            return Some(Rule::from_schema(json_schema!({ "$ref": "#" })));
        }
        if let Some(name) = self.names.get(&id) {
            return Some(def_ref(name));
        }

        let metadata = self.registry.resolve(form)?;
        let name = self.def_name(id);
        // Registered before compiling so self-references resolve to it.
        self.names.insert(id, name.clone());
        let schema = self.object_schema(id, &metadata);
        self.defs.insert(name.clone(), Value::Object(schema));
        Some(def_ref(&name))
    }

    /// Rule pointing at a schemars-generated schema for `type_name`.
    ///
    /// The schema is stored under `$defs/typed.<type>` and its own `$defs`
    /// under `typed.<type>.<def>`, with every internal `$ref` rewritten to
    /// match. Two types whose generated definitions share a short name
    /// therefore never shadow each other.
    pub fn typed_rule(&mut self, type_name: &str, mut schema: Schema) -> Rule {
        let name = format!("typed.{}", sanitize(type_name));
        if !self.defs.contains_key(&name) {
            schema.remove("$schema");
            let hoisted = match schema.remove("$defs") {
                Some(Value::Object(defs)) => defs,
                _ => Map::new(),
            };
            let mut root = schema.to_value();
            rewrite_refs(&mut root, &name);
            for (def, mut body) in hoisted {
                rewrite_refs(&mut body, &name);
                self.defs.insert(format!("{name}.{def}"), body);
            }
            self.defs.insert(name.clone(), root);
        }
        def_ref(&name)
    }

    fn def_name(&self, form: FormId) -> String {
        let base = format!("form.{}", sanitize(form.name()));
        let mut name = base.clone();
        let mut n = 1;
        while self.defs.contains_key(&name) || self.names.values().any(|taken| *taken == name) {
            n += 1;
            name = format!("{base}.{n}");
        }
        name
    }
}

fn def_ref(name: &str) -> Rule {
    Rule::from_schema(json_schema!({ "$ref": format!("#/$defs/{name}") }))
}

/// Type path as a `$defs` key: `::` becomes `.`, anything that would need
/// escaping in a JSON pointer becomes `_`.
fn sanitize(type_name: &str) -> String {
    type_name
        .replace("::", ".")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Re-point local refs of a schema moved to `$defs/<prefix>`.
fn rewrite_refs(value: &mut Value, prefix: &str) {
    match value {
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                match child {
                    Value::String(target) if key == "$ref" => {
                        if let Some(moved) = relocate(target, prefix) {
                            *target = moved;
                        }
                    }
                    _ => rewrite_refs(child, prefix),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                rewrite_refs(item, prefix);
            }
        }
        _ => {}
    }
}

fn relocate(target: &str, prefix: &str) -> Option<String> {
    if target == "#" {
        return Some(format!("#/$defs/{prefix}"));
    }
    target
        .strip_prefix("#/$defs/")
        .map(|rest| format!("#/$defs/{prefix}.{rest}"))
}
