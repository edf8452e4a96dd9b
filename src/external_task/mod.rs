//! External task processing for taskbridge.
//!
//! This module implements the generic "process external task" engine: topic
//! subscriptions against an orchestrator transport, isolated dispatch of each
//! delivered task to the handler registered for its topic, and the entity
//! task lifecycle (validate, resolve, invoke, mutate, signal, notify) with
//! retry classification. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
