//! Port contracts for the submission collaborators of publish tasks.

pub mod notifier;
pub mod publisher;
pub mod repository;

pub use notifier::{NotifierError, SubmissionChangeNotifier};
pub use publisher::{ArticlePublisher, PublisherError};
pub use repository::{SubmissionRepository, SubmissionRepositoryError, SubmissionRepositoryResult};

#[cfg(test)]
pub use notifier::MockSubmissionChangeNotifier;
#[cfg(test)]
pub use publisher::MockArticlePublisher;
#[cfg(test)]
pub use repository::MockSubmissionRepository;
