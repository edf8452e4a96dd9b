//! Mapping definitions resolved against an enum catalog.

use super::EnumCatalog;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One declared `enumValue → value` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingEntry {
    /// Enumeration member the entry maps.
    pub enum_value: String,
    /// Value the member maps to.
    pub value: Value,
}

/// Declared mapping as read from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingDefinitionSpec {
    /// Mapping name used in diagnostics.
    pub name: String,
    /// Name of the enumeration the mapping keys on.
    #[serde(rename = "enum")]
    pub enum_name: String,
    /// Declared entries; absent means no entries.
    #[serde(default)]
    pub mappings: Option<Vec<MappingEntry>>,
}

/// Resolved, read-only mapping from enumeration members to values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingDefinition {
    name: String,
    values: BTreeMap<String, Value>,
}

impl MappingDefinition {
    /// Resolves `spec` against `enums`.
    ///
    /// An unknown enumeration yields an empty mapping and an error log
    /// event. Entries naming undeclared members are dropped. When a member
    /// appears more than once the last entry wins.
    #[must_use]
    pub fn resolve(spec: &MappingDefinitionSpec, enums: &EnumCatalog) -> Self {
        let mut resolved = Self {
            name: spec.name.clone(),
            values: BTreeMap::new(),
        };

        let Some(definition) = enums.get(&spec.enum_name) else {
            tracing::error!(
                mapping = %spec.name,
                enum_name = %spec.enum_name,
                "unable to find enum ({}) for mapping ({})",
                spec.enum_name,
                spec.name
            );
            return resolved;
        };

        for entry in spec.mappings.iter().flatten() {
            if definition.contains(&entry.enum_value) {
                resolved
                    .values
                    .insert(entry.enum_value.clone(), entry.value.clone());
            }
        }
        resolved
    }

    /// Returns the mapping name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the resolved table.
    #[must_use]
    pub const fn mapping(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    /// Returns the value mapped to `member`.
    #[must_use]
    pub fn get(&self, member: &str) -> Option<&Value> {
        self.values.get(member)
    }

    /// Returns the number of resolved entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether nothing was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
