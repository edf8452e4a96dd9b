//! Enumeration-backed mapping resolution.
//!
//! Task handlers that translate an entity's enumerated fields into external
//! values use [`MappingDefinition`] to resolve a declared mapping against an
//! [`EnumCatalog`]. Resolution never fails: configuration integrity problems
//! are logged and degrade to an empty or partial table.

mod definition;
mod enum_catalog;

pub use definition::{MappingDefinition, MappingDefinitionSpec, MappingEntry};
pub use enum_catalog::{EnumCatalog, EnumDefinition};
