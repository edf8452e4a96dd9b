//! Publish-article entity action.
//!
//! Publishes a submission's article through an [`ArticlePublisher`], moves
//! the submission to `published`, persists it, and announces the change once
//! the orchestrator has acknowledged completion.

use crate::external_task::{
    domain::FieldProjection,
    ports::{ActionError, EntityAction},
    services::{EntityTaskHandler, HandlerSettings},
};
use crate::submission::{
    domain::{Submission, SubmissionDomainError, SubmissionId, SubmissionPhase},
    ports::{ArticlePublisher, PublisherError, SubmissionChangeNotifier, SubmissionRepository},
};
use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;

/// Default topic publish tasks are delivered on.
pub const PUBLISH_ARTICLE_TOPIC: &str = "publish-article";

/// Component name recorded on publish task log events.
pub const PUBLISH_ARTICLE_COMPONENT: &str = "external-task/publish-article";

/// Submission fields the action itself reads or writes.
const LIFECYCLE_FIELDS: [&str; 4] = ["id", "phase", "publishDate", "lastPublishDate"];

/// Entity action publishing one submission's article per task.
pub struct PublishArticleAction<R, P, N, C>
where
    R: SubmissionRepository,
    P: ArticlePublisher,
    N: SubmissionChangeNotifier,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    publisher: Arc<P>,
    notifier: Arc<N>,
    clock: Arc<C>,
    invoke_timeout: Duration,
}

impl<R, P, N, C> PublishArticleAction<R, P, N, C>
where
    R: SubmissionRepository,
    P: ArticlePublisher,
    N: SubmissionChangeNotifier,
    C: Clock + Send + Sync,
{
    /// Creates the action.
    ///
    /// `invoke_timeout` bounds each call to the publisher; it should be
    /// shorter than the orchestrator's task lock.
    #[must_use]
    pub const fn new(
        repository: Arc<R>,
        publisher: Arc<P>,
        notifier: Arc<N>,
        clock: Arc<C>,
        invoke_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            publisher,
            notifier,
            clock,
            invoke_timeout,
        }
    }

    /// Wraps the action in an entity task handler.
    #[must_use]
    pub fn into_handler(self, settings: HandlerSettings) -> EntityTaskHandler<Self> {
        EntityTaskHandler::new(PUBLISH_ARTICLE_COMPONENT, self, settings)
    }
}

#[async_trait]
impl<R, P, N, C> EntityAction for PublishArticleAction<R, P, N, C>
where
    R: SubmissionRepository,
    P: ArticlePublisher,
    N: SubmissionChangeNotifier,
    C: Clock + Send + Sync,
{
    type Key = SubmissionId;
    type Entity = Submission;

    fn label(&self) -> &str {
        "Publish Article"
    }

    fn parse_key(&self, raw: &str) -> Result<Self::Key, ActionError> {
        SubmissionId::parse(raw).map_err(|err| ActionError::MalformedKey {
            key: raw.to_owned(),
            reason: err.to_string(),
        })
    }

    fn projection(&self) -> FieldProjection {
        self.publisher
            .required_fields()
            .union(&FieldProjection::of(LIFECYCLE_FIELDS))
    }

    async fn load(
        &self,
        key: &Self::Key,
        projection: &FieldProjection,
    ) -> Result<Option<Self::Entity>, ActionError> {
        self.repository
            .find(*key, projection)
            .await
            .map_err(ActionError::transient)
    }

    async fn invoke(&self, entity: &Self::Entity) -> Result<(), ActionError> {
        if !entity.phase().can_transition_to(SubmissionPhase::Published) {
            return Err(ActionError::permanent(
                SubmissionDomainError::InvalidPhaseTransition {
                    submission_id: entity.id(),
                    from: entity.phase(),
                    to: SubmissionPhase::Published,
                },
            ));
        }

        match tokio::time::timeout(self.invoke_timeout, self.publisher.publish(entity)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err @ PublisherError::Rejected { .. })) => Err(ActionError::permanent(err)),
            Ok(Err(err @ PublisherError::Unavailable(_))) => Err(ActionError::transient(err)),
            Err(_) => Err(ActionError::TimedOut(self.invoke_timeout)),
        }
    }

    fn apply_success(&self, entity: &mut Self::Entity) -> Result<(), ActionError> {
        entity
            .record_publication(self.clock.as_ref())
            .map_err(ActionError::permanent)
    }

    async fn persist(&self, entity: &Self::Entity) -> Result<(), ActionError> {
        self.repository
            .save(entity)
            .await
            .map_err(ActionError::transient)
    }

    async fn notify_modified(&self, entity: &Self::Entity) -> Result<(), ActionError> {
        self.notifier
            .publish_state_modified(entity)
            .await
            .map_err(ActionError::transient)
    }

    fn describe(&self, entity: &Self::Entity) -> String {
        entity
            .manuscript_id()
            .map_or_else(|| entity.id().to_string(), ToOwned::to_owned)
    }
}
