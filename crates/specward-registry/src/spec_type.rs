//! Spec type records: the validation rules derived from one template.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// File extension mandated for data-only (case) documents.
pub const DATA_EXTENSION: &str = "yaml";

/// File extension mandated for prose documents.
pub const PROSE_EXTENSION: &str = "md";

/// Required fields assumed when a template declares none.
pub const DEFAULT_REQUIRED_FIELDS: [&str; 4] = ["id", "name", "type", "timestamp"];

/// Validation rules for one declared spec type.
///
/// One instance per template; immutable once the registry is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecType {
    pub name: String,
    /// Identifier prefix, e.g. `TC` for identifiers `TC-001`.
    pub prefix: String,
    /// Ordered required-field list checked against every document header.
    pub required_fields: Vec<String>,
    /// Mandated file extension: `yaml` for case types, `md` otherwise.
    pub extension: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name_guidelines: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name_examples: Vec<String>,
    /// Template file this type was derived from, relative to the template dir.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub template: String,
}

impl SpecType {
    pub fn is_case_type(&self) -> bool {
        self.extension == DATA_EXTENSION
    }
}

/// Immutable mapping from type name to its validation rules.
///
/// Construction rejects ambiguous registries outright: a duplicate type name
/// or a duplicate identifier prefix is fatal, since every downstream rule
/// depends on an unambiguous mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRegistry {
    types: BTreeMap<String, SpecType>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, spec_type: SpecType) -> Result<(), RegistryError> {
        if let Some(existing) = self.types.get(&spec_type.name) {
            return Err(RegistryError::DuplicateType {
                name: spec_type.name,
                first: existing.template.clone(),
                second: spec_type.template,
            });
        }
        if !spec_type.prefix.is_empty()
            && let Some(existing) = self.by_prefix(&spec_type.prefix)
        {
            return Err(RegistryError::DuplicatePrefix {
                prefix: spec_type.prefix,
                first: existing.name.clone(),
                second: spec_type.name,
            });
        }
        self.types.insert(spec_type.name.clone(), spec_type);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&SpecType> {
        self.types.get(name)
    }

    pub fn by_prefix(&self, prefix: &str) -> Option<&SpecType> {
        self.types.values().find(|t| t.prefix == prefix)
    }

    /// Types in deterministic (alphabetical) order.
    pub fn iter(&self) -> impl Iterator<Item = &SpecType> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Fatal conflicts during registry construction.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate spec type '{name}' declared by '{first}' and '{second}'")]
    DuplicateType {
        name: String,
        first: String,
        second: String,
    },

    #[error("duplicate identifier prefix '{prefix}' shared by types '{first}' and '{second}'")]
    DuplicatePrefix {
        prefix: String,
        first: String,
        second: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_type(name: &str, prefix: &str, template: &str) -> SpecType {
        SpecType {
            name: name.to_string(),
            prefix: prefix.to_string(),
            required_fields: DEFAULT_REQUIRED_FIELDS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            extension: DATA_EXTENSION.to_string(),
            name_guidelines: String::new(),
            name_examples: Vec::new(),
            template: template.to_string(),
        }
    }

    #[test]
    fn insert_rejects_duplicate_type_name() {
        let mut registry = TypeRegistry::new();
        registry
            .insert(spec_type("TestCase", "TC", "spec-test-case.yaml"))
            .expect("first insert should succeed");

        let err = registry
            .insert(spec_type("TestCase", "TX", "spec-test-case-copy.yaml"))
            .expect_err("duplicate type name must be fatal");
        assert!(matches!(err, RegistryError::DuplicateType { .. }));
    }

    #[test]
    fn insert_rejects_duplicate_prefix() {
        let mut registry = TypeRegistry::new();
        registry
            .insert(spec_type("TestCase", "TC", "spec-test-case.yaml"))
            .expect("first insert should succeed");

        let err = registry
            .insert(spec_type("TraceCheck", "TC", "spec-trace-check.yaml"))
            .expect_err("duplicate prefix must be fatal");
        assert!(matches!(err, RegistryError::DuplicatePrefix { .. }));
    }

    #[test]
    fn iteration_order_is_alphabetical() {
        let mut registry = TypeRegistry::new();
        registry
            .insert(spec_type("Workflow", "W", "spec-workflow.md"))
            .expect("insert should succeed");
        registry
            .insert(spec_type("Concept", "C", "spec-concept.md"))
            .expect("insert should succeed");
        registry
            .insert(spec_type("TestCase", "TC", "spec-test-case.yaml"))
            .expect("insert should succeed");

        let names: Vec<&str> = registry.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Concept", "TestCase", "Workflow"]);
    }

    #[test]
    fn lookup_by_prefix() {
        let mut registry = TypeRegistry::new();
        registry
            .insert(spec_type("TestCase", "TC", "spec-test-case.yaml"))
            .expect("insert should succeed");

        assert_eq!(
            registry.by_prefix("TC").map(|t| t.name.as_str()),
            Some("TestCase")
        );
        assert!(registry.by_prefix("ZZ").is_none());
    }
}
