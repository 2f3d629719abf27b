//! When steps for task provisioning BDD scenarios.

use super::world::{ProvisioningWorld, run_async};
use rstest_bdd_macros::when;

#[when("the task request is processed")]
fn process_task_request(world: &mut ProvisioningWorld) -> Result<(), eyre::Report> {
    let request = world
        .pending_request
        .take()
        .ok_or_else(|| eyre::eyre!("missing pending request in scenario world"))?;
    let orchestrator = world
        .orchestrator
        .as_ref()
        .ok_or_else(|| eyre::eyre!("provisioning service was not configured"))?;

    world.outcome = Some(run_async(orchestrator.process(request)));
    Ok(())
}
