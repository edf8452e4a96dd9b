//! Submission publishing driven by external tasks.
//!
//! This module holds the illustrative entity behind the generic external
//! task lifecycle: a submission that is published to an external article
//! repository when the orchestrator delivers a `publish-article` task. It
//! follows the same hexagonal layout as the task engine:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Entity actions in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
