//! Port contracts for external task processing.
//!
//! Ports define infrastructure-agnostic interfaces used by the registry,
//! worker, and entity task handlers.

pub mod action;
pub mod handler;
pub mod service;
pub mod transport;

pub use action::{ActionError, EntityAction};
pub use handler::ExternalTaskHandler;
pub use service::{TaskService, TaskServiceError, TaskServiceResult};
pub use transport::{TaskTransport, TransportError, TransportResult};

#[cfg(test)]
pub use service::MockTaskService;
