//! Given steps for task provisioning BDD scenarios.

use std::sync::Arc;

use super::world::{EVALUATION_URL, ProvisioningWorld};
use mockable::DefaultClock;
use pagesmith::generator::TemplateContentGenerator;
use pagesmith::provisioning::{
    adapters::{InMemoryRepositoryProvider, ProviderOperation},
    domain::{Attachment, PublishingTarget, TaskRequest},
    services::{OrchestratorSettings, TaskOrchestrator},
};
use rstest_bdd_macros::given;

const SALES_CSV_URI: &str =
    "data:text/csv;base64,UHJvZHVjdCxTYWxlcwpXaWRnZXQsMTAwCkdhZGdldCw1MA==";

#[given(r#"a provisioning service for owner "{owner}" with secret "{secret}""#)]
fn provisioning_service(world: &mut ProvisioningWorld, owner: String, secret: String) {
    world.provider = InMemoryRepositoryProvider::new(owner.clone());
    let target = PublishingTarget::new(owner, "github.com", "github.io");
    world.orchestrator = Some(TaskOrchestrator::new(
        Arc::new(world.provider.clone()),
        Arc::new(TemplateContentGenerator::new("Scenario Student")),
        Arc::new(world.notifier.clone()),
        Arc::new(DefaultClock),
        OrchestratorSettings::new(secret, target),
    ));
}

#[given(r#"a task request "{task}" with secret "{secret}""#)]
fn task_request(world: &mut ProvisioningWorld, task: String, secret: String) {
    world.pending_request = Some(TaskRequest {
        email: "student@example.test".to_owned(),
        secret,
        task,
        round: 1,
        nonce: "scenario-nonce".to_owned(),
        brief: "Summarize sales from data.csv".to_owned(),
        checks: Vec::new(),
        evaluation_url: EVALUATION_URL.to_owned(),
        attachments: Vec::new(),
    });
}

#[given("the request carries the sample sales data")]
fn request_carries_sales_data(world: &mut ProvisioningWorld) -> Result<(), eyre::Report> {
    let request = world
        .pending_request
        .as_mut()
        .ok_or_else(|| eyre::eyre!("missing pending request in scenario world"))?;
    request
        .attachments
        .push(Attachment::new("data.csv", SALES_CSV_URI));
    Ok(())
}

#[given("static hosting is unavailable")]
fn static_hosting_unavailable(world: &mut ProvisioningWorld) {
    world.provider.fail_on(
        ProviderOperation::EnableStaticHosting,
        "Pages is not available for this repository",
    );
}

#[given(r#"pushing content fails with "{message}""#)]
fn pushing_content_fails(world: &mut ProvisioningWorld, message: String) {
    world.provider.fail_on(ProviderOperation::WriteFile, message);
}
