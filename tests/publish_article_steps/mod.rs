//! Step definitions for publish-article behaviour scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
