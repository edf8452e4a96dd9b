//! Given steps for publish-article scenarios.

use super::world::PublishWorld;
use chrono::Utc;
use eyre::eyre;
use rstest_bdd_macros::given;
use taskbridge::external_task::domain::{
    ExternalTask, MissingEntityPolicy, RetryPolicy, TopicName,
};
use taskbridge::submission::{
    domain::{PersistedSubmissionData, Submission, SubmissionId, SubmissionPhase},
    ports::PublisherError,
    services::PUBLISH_ARTICLE_TOPIC,
};

fn publish_task(task_id: &str) -> Result<ExternalTask, eyre::Report> {
    Ok(ExternalTask::new(task_id, TopicName::new(PUBLISH_ARTICLE_TOPIC)?))
}

#[given(r#"an accepted submission "{manuscript}""#)]
fn accepted_submission(world: &mut PublishWorld, manuscript: String) -> Result<(), eyre::Report> {
    let created = Utc::now();
    let submission = Submission::from_persisted(PersistedSubmissionData {
        id: SubmissionId::new(),
        manuscript_id: Some(manuscript.clone()),
        title: format!("Manuscript {manuscript}"),
        phase: SubmissionPhase::Accepted,
        publish_date: None,
        last_publish_date: None,
        created_at: created,
        updated_at: created,
    });
    world.repository.insert(submission.clone())?;
    world.submission = Some(submission);
    Ok(())
}

#[given("a publish task for that submission")]
fn task_for_submission(world: &mut PublishWorld) -> Result<(), eyre::Report> {
    let submission = world
        .submission
        .as_ref()
        .ok_or_else(|| eyre!("no submission in scenario"))?;
    world.task = Some(publish_task("task-publish")?.with_business_key(submission.id().to_string()));
    Ok(())
}

#[given("a publish task without a business key")]
fn task_without_key(world: &mut PublishWorld) -> Result<(), eyre::Report> {
    world.task = Some(publish_task("task-keyless")?.with_process_instance_id("process-1"));
    Ok(())
}

#[given("a publish task for an unknown submission")]
fn task_for_unknown_submission(world: &mut PublishWorld) -> Result<(), eyre::Report> {
    world.task =
        Some(publish_task("task-orphan")?.with_business_key(SubmissionId::new().to_string()));
    Ok(())
}

#[given("the article repository is unavailable")]
fn repository_unavailable(world: &mut PublishWorld) -> Result<(), eyre::Report> {
    world
        .publisher
        .fail_with(Some(PublisherError::unavailable(std::io::Error::other(
            "503 service unavailable",
        ))))?;
    Ok(())
}

#[given("missing submissions are completed")]
fn missing_submissions_completed(world: &mut PublishWorld) -> Result<(), eyre::Report> {
    world.settings.missing_entity = MissingEntityPolicy::Complete;
    Ok(())
}

#[given("failures are left for lock expiry")]
fn failures_deferred(world: &mut PublishWorld) -> Result<(), eyre::Report> {
    world.settings.retry_policy = RetryPolicy::DeferToLockExpiry;
    Ok(())
}
