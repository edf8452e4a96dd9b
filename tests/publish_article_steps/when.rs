//! When steps for publish-article scenarios.

use super::world::{PublishWorld, run_async};
use eyre::eyre;
use mockable::DefaultClock;
use rstest_bdd_macros::when;
use std::sync::Arc;
use std::time::Duration;
use taskbridge::external_task::ports::ExternalTaskHandler;
use taskbridge::submission::services::PublishArticleAction;

#[when("the publish task is handled")]
fn publish_task_handled(world: &mut PublishWorld) -> Result<(), eyre::Report> {
    let task = world
        .task
        .clone()
        .ok_or_else(|| eyre!("no task in scenario"))?;
    let handler = PublishArticleAction::new(
        Arc::new(world.repository.clone()),
        Arc::clone(&world.publisher),
        Arc::new(world.notifier.clone()),
        Arc::new(DefaultClock),
        Duration::from_secs(5),
    )
    .into_handler(world.settings);

    let outcome = run_async(handler.handle(&task, &world.service));
    world.outcome = Some(outcome);
    Ok(())
}
