//! In-memory submission adapters for tests and local runs.

mod notifier;
mod publisher;
mod repository;

pub use notifier::InMemoryChangeNotifier;
pub use publisher::InMemoryArticlePublisher;
pub use repository::InMemorySubmissionRepository;
