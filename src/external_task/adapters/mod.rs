//! Adapter implementations for external task ports.

pub mod json_lines;
pub mod memory;

pub use json_lines::{JsonLinesTaskService, JsonLinesTransport};
pub use memory::{InMemoryTaskService, InMemoryTaskTransport, TaskSignal};
