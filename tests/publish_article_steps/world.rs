//! Shared world state for publish-article BDD scenarios.

use std::sync::Arc;

use rstest::fixture;
use taskbridge::external_task::{
    adapters::InMemoryTaskService,
    domain::{ExternalTask, TaskOutcome},
    services::HandlerSettings,
};
use taskbridge::submission::{
    adapters::memory::{
        InMemoryArticlePublisher, InMemoryChangeNotifier, InMemorySubmissionRepository,
    },
    domain::Submission,
};

/// Scenario world for publish-article behaviour tests.
pub struct PublishWorld {
    /// Submission store the handler loads from and saves to.
    pub repository: InMemorySubmissionRepository,
    /// Article repository the publication is sent to.
    pub publisher: Arc<InMemoryArticlePublisher>,
    /// Recorder for submission change notifications.
    pub notifier: InMemoryChangeNotifier,
    /// Orchestrator signal recorder.
    pub service: InMemoryTaskService,
    /// Failure handling applied by the handler under test.
    pub settings: HandlerSettings,
    /// Submission seeded by the scenario, if any.
    pub submission: Option<Submission>,
    /// Task delivered to the handler.
    pub task: Option<ExternalTask>,
    /// Outcome returned by the handler.
    pub outcome: Option<TaskOutcome>,
}

impl PublishWorld {
    /// Creates a world with empty stores and default handler settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            repository: InMemorySubmissionRepository::new(),
            publisher: Arc::new(InMemoryArticlePublisher::new()),
            notifier: InMemoryChangeNotifier::new(),
            service: InMemoryTaskService::new(),
            settings: HandlerSettings::default(),
            submission: None,
            task: None,
            outcome: None,
        }
    }
}

impl Default for PublishWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> PublishWorld {
    PublishWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
