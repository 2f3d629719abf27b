//! Then steps for task provisioning BDD scenarios.

use super::world::{EVALUATION_URL, ProvisioningWorld};
use pagesmith::provisioning::services::{ProvisioningError, TaskProcessingError};
use rstest_bdd_macros::then;

#[then("the task succeeds")]
fn task_succeeds(world: &ProvisioningWorld) -> Result<(), eyre::Report> {
    world.result().map(|_| ())
}

#[then(r#"the task fails with message "{message}""#)]
fn task_fails_with_message(world: &ProvisioningWorld, message: String) -> Result<(), eyre::Report> {
    match world.outcome.as_ref() {
        Some(Err(err)) if err.to_string() == message => Ok(()),
        other => Err(eyre::eyre!("expected failure '{message}', got {other:?}")),
    }
}

#[then(r#"the task fails at step "{step}""#)]
fn task_fails_at_step(world: &ProvisioningWorld, step: String) -> Result<(), eyre::Report> {
    match world.outcome.as_ref() {
        Some(Err(TaskProcessingError::Provisioning(ProvisioningError::Provider {
            step: failed,
            ..
        }))) if failed.as_str() == step => Ok(()),
        other => Err(eyre::eyre!("expected failure at '{step}', got {other:?}")),
    }
}

#[then(r#"the repository contains the file "{path}""#)]
fn repository_contains_file(world: &ProvisioningWorld, path: String) -> Result<(), eyre::Report> {
    let name = world.repository_name()?;
    let files = world
        .provider
        .files(&name)
        .ok_or_else(|| eyre::eyre!("repository {name} was not created"))?;
    if !files.contains_key(&path) {
        return Err(eyre::eyre!("{path} missing from {name}: {files:?}"));
    }
    Ok(())
}

#[then(r#"the index page contains "{text}""#)]
fn index_page_contains(world: &ProvisioningWorld, text: String) -> Result<(), eyre::Report> {
    let name = world.repository_name()?;
    let page = world
        .provider
        .files(&name)
        .and_then(|files| files.get("index.html").cloned())
        .ok_or_else(|| eyre::eyre!("index.html missing from {name}"))?;
    if !page.contains(&text) {
        return Err(eyre::eyre!("index.html does not contain '{text}'"));
    }
    Ok(())
}

#[then("static hosting is enabled")]
fn static_hosting_enabled(world: &ProvisioningWorld) -> Result<(), eyre::Report> {
    let name = world.repository_name()?;
    if !world.provider.hosting_enabled(&name) {
        return Err(eyre::eyre!("static hosting was not enabled for {name}"));
    }
    Ok(())
}

#[then("static hosting is not enabled")]
fn static_hosting_not_enabled(world: &ProvisioningWorld) -> Result<(), eyre::Report> {
    let name = world.repository_name()?;
    if world.provider.hosting_enabled(&name) {
        return Err(eyre::eyre!("static hosting unexpectedly enabled for {name}"));
    }
    Ok(())
}

#[then("the result is delivered to the evaluation URL")]
fn result_delivered(world: &ProvisioningWorld) -> Result<(), eyre::Report> {
    let result = world.result()?;
    let deliveries = world.notifier.deliveries();
    match deliveries.as_slice() {
        [(url, delivered)] if url == EVALUATION_URL && delivered == result => Ok(()),
        other => Err(eyre::eyre!("unexpected deliveries {other:?}")),
    }
}

#[then("no result is delivered")]
fn no_result_delivered(world: &ProvisioningWorld) -> Result<(), eyre::Report> {
    let deliveries = world.notifier.deliveries();
    if !deliveries.is_empty() {
        return Err(eyre::eyre!("unexpected deliveries {deliveries:?}"));
    }
    Ok(())
}

#[then("no repository is created")]
fn no_repository_created(world: &ProvisioningWorld) -> Result<(), eyre::Report> {
    let calls = world.provider.calls();
    if !calls.is_empty() {
        return Err(eyre::eyre!("unexpected provider calls {calls:?}"));
    }
    Ok(())
}
