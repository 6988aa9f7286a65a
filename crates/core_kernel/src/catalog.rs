//! Operation catalog
//!
//! A static registry mapping operation name to its argument requirements.
//! Built once at process start and read-only thereafter. Entries declare
//! which arguments must be present and which optional ones carry defaults;
//! they intentionally do not describe JSON types — coercion (string dates to
//! timestamps, numbers to decimals) is a handler concern.

use std::collections::HashMap;

use serde_json::{Map, Value};

/// Argument requirements for one named operation.
#[derive(Debug, Clone)]
pub struct OperationSpec {
    pub name: &'static str,
    pub description: &'static str,
    required: Vec<&'static str>,
    defaults: Vec<(&'static str, Value)>,
    optional: Vec<&'static str>,
}

impl OperationSpec {
    pub fn new(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            required: Vec::new(),
            defaults: Vec::new(),
            optional: Vec::new(),
        }
    }

    /// Declares a required argument.
    pub fn require(mut self, arg: &'static str) -> Self {
        self.required.push(arg);
        self
    }

    /// Declares an optional argument with no default.
    pub fn optional(mut self, arg: &'static str) -> Self {
        self.optional.push(arg);
        self
    }

    /// Declares an optional argument with a default value.
    pub fn default_value(mut self, arg: &'static str, value: Value) -> Self {
        self.defaults.push((arg, value));
        self
    }

    pub fn required_args(&self) -> &[&'static str] {
        &self.required
    }

    /// All argument names the operation understands, in declaration order.
    pub fn argument_names(&self) -> Vec<&'static str> {
        self.required
            .iter()
            .chain(self.defaults.iter().map(|(name, _)| name))
            .chain(self.optional.iter())
            .copied()
            .collect()
    }

    /// Default value for an argument, if one is declared.
    pub fn default_for(&self, arg: &str) -> Option<&Value> {
        self.defaults
            .iter()
            .find(|(name, _)| *name == arg)
            .map(|(_, value)| value)
    }

    /// Returns the required arguments absent from `arguments`.
    pub fn missing_required(&self, arguments: &Map<String, Value>) -> Vec<&'static str> {
        self.required
            .iter()
            .filter(|name| !arguments.contains_key(**name))
            .copied()
            .collect()
    }

    /// Fills declared defaults into `arguments` where the caller omitted them.
    pub fn apply_defaults(&self, arguments: &mut Map<String, Value>) {
        for (name, value) in &self.defaults {
            arguments
                .entry(name.to_string())
                .or_insert_with(|| value.clone());
        }
    }
}

/// Immutable name-to-spec registry, built once at startup.
#[derive(Debug, Default)]
pub struct OperationCatalog {
    specs: HashMap<&'static str, OperationSpec>,
    order: Vec<&'static str>,
}

impl OperationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a spec. Later registrations with the same name replace
    /// earlier ones; the standard catalog never does this.
    pub fn register(&mut self, spec: OperationSpec) {
        let name = spec.name;
        if self.specs.insert(name, spec).is_none() {
            self.order.push(name);
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&OperationSpec> {
        self.specs.get(name)
    }

    /// Specs in registration order, for `tools/list`-style enumeration.
    pub fn iter(&self) -> impl Iterator<Item = &OperationSpec> {
        self.order.iter().filter_map(|name| self.specs.get(name))
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_spec() -> OperationSpec {
        OperationSpec::new("search_contacts", "Search for contacts")
            .optional("email")
            .optional("firstname")
            .default_value("limit", json!(100))
    }

    #[test]
    fn lookup_finds_registered_spec() {
        let mut catalog = OperationCatalog::new();
        catalog.register(sample_spec());
        assert!(catalog.lookup("search_contacts").is_some());
        assert!(catalog.lookup("nonexistent").is_none());
    }

    #[test]
    fn missing_required_reports_absent_names() {
        let spec = OperationSpec::new("create_contact", "Create a contact")
            .require("email")
            .require("first_name")
            .require("last_name");
        let mut args = Map::new();
        args.insert("email".to_string(), json!("a@b.com"));
        assert_eq!(spec.missing_required(&args), vec!["first_name", "last_name"]);
    }

    #[test]
    fn apply_defaults_preserves_caller_values() {
        let spec = sample_spec();
        let mut args = Map::new();
        args.insert("limit".to_string(), json!(5));
        spec.apply_defaults(&mut args);
        assert_eq!(args["limit"], json!(5));

        let mut empty = Map::new();
        spec.apply_defaults(&mut empty);
        assert_eq!(empty["limit"], json!(100));
    }

    #[test]
    fn argument_names_cover_all_declarations() {
        let names = sample_spec().argument_names();
        assert_eq!(names, vec!["limit", "email", "firstname"]);
    }
}
