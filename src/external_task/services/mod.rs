//! Application services for external task dispatch and processing.

mod lifecycle;
mod registry;
mod worker;

pub use lifecycle::{EntityTaskHandler, HandlerSettings};
pub use registry::{DispatchError, RegistryError, TaskDispatch, TaskHandlerRegistry};
pub use worker::{ExternalTaskWorker, WorkerError, WorkerSummary};
