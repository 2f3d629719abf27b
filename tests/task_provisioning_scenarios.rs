//! Behaviour tests for the task provisioning pipeline.

#[path = "task_provisioning_steps/mod.rs"]
mod task_provisioning_steps_defs;

use rstest_bdd_macros::scenario;
use task_provisioning_steps_defs::world::{ProvisioningWorld, world};

#[scenario(
    path = "tests/features/task_provisioning.feature",
    name = "Provision a sales summary task"
)]
#[tokio::test(flavor = "multi_thread")]
async fn provision_sales_summary_task(world: ProvisioningWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_provisioning.feature",
    name = "Reject a task with the wrong secret"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reject_task_with_wrong_secret(world: ProvisioningWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_provisioning.feature",
    name = "Continue when static hosting cannot be enabled"
)]
#[tokio::test(flavor = "multi_thread")]
async fn continue_without_static_hosting(world: ProvisioningWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_provisioning.feature",
    name = "Stop when pushing content fails"
)]
#[tokio::test(flavor = "multi_thread")]
async fn stop_when_push_fails(world: ProvisioningWorld) {
    let _ = world;
}
