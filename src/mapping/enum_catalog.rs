//! Named enumerations referenced by mapping definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One enumeration: member names and their display labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDefinition {
    #[serde(default)]
    values: BTreeMap<String, String>,
}

impl EnumDefinition {
    /// Creates an enumeration from `(member, label)` pairs.
    #[must_use]
    pub fn new<M, L>(members: impl IntoIterator<Item = (M, L)>) -> Self
    where
        M: Into<String>,
        L: Into<String>,
    {
        Self {
            values: members
                .into_iter()
                .map(|(member, label)| (member.into(), label.into()))
                .collect(),
        }
    }

    /// Returns whether `member` is declared.
    #[must_use]
    pub fn contains(&self, member: &str) -> bool {
        self.values.contains_key(member)
    }

    /// Returns the label of `member`.
    #[must_use]
    pub fn label(&self, member: &str) -> Option<&str> {
        self.values.get(member).map(String::as_str)
    }

    /// Iterates declared members in name order.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// Enumerations keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnumCatalog {
    enums: BTreeMap<String, EnumDefinition>,
}

impl EnumCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the enumeration called `name`.
    #[must_use]
    pub fn with_enum(mut self, name: impl Into<String>, definition: EnumDefinition) -> Self {
        self.enums.insert(name.into(), definition);
        self
    }

    /// Returns the enumeration called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&EnumDefinition> {
        self.enums.get(name)
    }
}
