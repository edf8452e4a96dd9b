//! Entity field projection requested from stores.

use std::collections::BTreeSet;

/// Set of entity fields a handler needs when loading its entity.
///
/// An empty projection requests every field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldProjection {
    fields: BTreeSet<String>,
}

impl FieldProjection {
    /// Creates a projection requesting every field.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            fields: BTreeSet::new(),
        }
    }

    /// Creates a projection restricted to the given fields.
    #[must_use]
    pub fn of(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns whether every field is requested.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns whether the projection includes the named field.
    #[must_use]
    pub fn includes(&self, field: &str) -> bool {
        self.is_all() || self.fields.contains(field)
    }

    /// Iterates the explicitly requested fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    /// Returns a projection requesting the fields of both projections.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_all() || other.is_all() {
            return Self::all();
        }
        Self {
            fields: self.fields.union(&other.fields).cloned().collect(),
        }
    }
}
