//! Taskbridge: external task worker bridge.
//!
//! This crate subscribes to topics published by an external business-process
//! orchestrator, runs a domain action against a persisted entity for every
//! delivered task, and reports completion or failure back to the
//! orchestrator with retry semantics.
//!
//! # Architecture
//!
//! Taskbridge follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, JSON lines)
//!
//! # Modules
//!
//! - [`external_task`]: Topic registry, generic entity task lifecycle, and
//!   the worker loop
//! - [`submission`]: Submission entity and the publish-article action
//! - [`mapping`]: Enumeration-backed mapping resolution
//! - [`config`]: Layered worker configuration
//! - [`logging`]: Subscriber installation for structured logs

pub mod config;
pub mod external_task;
pub mod logging;
pub mod mapping;
pub mod submission;
