//! Then steps for publish-article scenarios.

use super::world::PublishWorld;
use eyre::{ensure, eyre};
use rstest_bdd_macros::then;
use std::time::Duration;
use taskbridge::external_task::{
    adapters::TaskSignal,
    domain::{ExternalTask, TaskOutcome},
};
use taskbridge::submission::domain::SubmissionPhase;

fn task(world: &PublishWorld) -> Result<&ExternalTask, eyre::Report> {
    world.task.as_ref().ok_or_else(|| eyre!("no task in scenario"))
}

fn outcome(world: &PublishWorld) -> Result<&TaskOutcome, eyre::Report> {
    world
        .outcome
        .as_ref()
        .ok_or_else(|| eyre!("task was not handled"))
}

#[then("the task is completed")]
fn task_completed(world: &PublishWorld) -> Result<(), eyre::Report> {
    ensure!(
        *outcome(world)? == TaskOutcome::Completed,
        "unexpected outcome {:?}",
        world.outcome
    );
    let task_id = task(world)?.id().to_owned();
    ensure!(world.service.signal_for(&task_id)? == Some(TaskSignal::Completed { task_id }));
    Ok(())
}

#[then("the task is failed permanently")]
fn task_failed_permanently(world: &PublishWorld) -> Result<(), eyre::Report> {
    let report = outcome(world)?
        .failure()
        .ok_or_else(|| eyre!("expected a failure, got {:?}", world.outcome))?;
    ensure!(report.is_permanent());
    ensure!(report.error_message() == "Publish Article Failed");
    Ok(())
}

#[then("the task is failed with {retries:u32} retries after {delay:u64} milliseconds")]
fn task_failed_with_retries(
    world: &PublishWorld,
    retries: u32,
    delay: u64,
) -> Result<(), eyre::Report> {
    let report = outcome(world)?
        .failure()
        .ok_or_else(|| eyre!("expected a failure, got {:?}", world.outcome))?;
    ensure!(report.retries() == retries, "retries were {}", report.retries());
    ensure!(report.retry_timeout() == Duration::from_millis(delay));
    let signal = world
        .service
        .signal_for(task(world)?.id())?
        .ok_or_else(|| eyre!("no failure signal was sent"))?;
    ensure!(matches!(signal, TaskSignal::Failed { .. }));
    Ok(())
}

#[then("the task is ignored without a signal")]
fn task_ignored(world: &PublishWorld) -> Result<(), eyre::Report> {
    ensure!(*outcome(world)? == TaskOutcome::Ignored);
    ensure!(world.service.signals()?.is_empty());
    Ok(())
}

#[then("the task is deferred without a signal")]
fn task_deferred(world: &PublishWorld) -> Result<(), eyre::Report> {
    ensure!(matches!(outcome(world)?, TaskOutcome::Deferred { .. }));
    ensure!(world.service.signals()?.is_empty());
    Ok(())
}

#[then(r#"the submission phase is "{phase}""#)]
fn submission_phase(world: &PublishWorld, phase: String) -> Result<(), eyre::Report> {
    let expected = SubmissionPhase::try_from(phase.as_str())?;
    let id = world
        .submission
        .as_ref()
        .ok_or_else(|| eyre!("no submission in scenario"))?
        .id();
    let stored = world
        .repository
        .get(id)?
        .ok_or_else(|| eyre!("submission vanished"))?;
    ensure!(stored.phase() == expected, "phase is {}", stored.phase());
    Ok(())
}

#[then("the submission change was announced")]
fn change_announced(world: &PublishWorld) -> Result<(), eyre::Report> {
    let id = world
        .submission
        .as_ref()
        .ok_or_else(|| eyre!("no submission in scenario"))?
        .id();
    ensure!(world.notifier.notified()? == vec![id]);
    Ok(())
}

#[then("nothing was published")]
fn nothing_published(world: &PublishWorld) -> Result<(), eyre::Report> {
    ensure!(world.publisher.published()?.is_empty());
    ensure!(world.notifier.notified()?.is_empty());
    Ok(())
}
