//! Shared world state for task provisioning BDD scenarios.

use mockable::DefaultClock;
use pagesmith::generator::TemplateContentGenerator;
use pagesmith::provisioning::{
    adapters::{InMemoryRepositoryProvider, RecordingNotifier},
    domain::{ProvisioningResult, TaskRequest},
    services::{TaskOrchestrator, TaskProcessingError},
};
use rstest::fixture;

/// Evaluation URL used by every scenario request.
pub const EVALUATION_URL: &str = "https://evaluator.example.test/notify";

/// Orchestrator type used by the BDD world.
pub type TestOrchestrator = TaskOrchestrator<
    InMemoryRepositoryProvider,
    TemplateContentGenerator,
    RecordingNotifier,
    DefaultClock,
>;

/// Scenario world for task provisioning behaviour tests.
pub struct ProvisioningWorld {
    pub provider: InMemoryRepositoryProvider,
    pub notifier: RecordingNotifier,
    pub orchestrator: Option<TestOrchestrator>,
    pub pending_request: Option<TaskRequest>,
    pub outcome: Option<Result<ProvisioningResult, TaskProcessingError>>,
}

impl ProvisioningWorld {
    /// Creates a world with no service configured yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            provider: InMemoryRepositoryProvider::new("unset"),
            notifier: RecordingNotifier::new(),
            orchestrator: None,
            pending_request: None,
            outcome: None,
        }
    }

    /// Returns the successful result of the processed request.
    pub fn result(&self) -> Result<&ProvisioningResult, eyre::Report> {
        match self.outcome.as_ref() {
            Some(Ok(result)) => Ok(result),
            Some(Err(err)) => Err(eyre::eyre!("task failed: {err}")),
            None => Err(eyre::eyre!("task request has not been processed")),
        }
    }

    /// Returns the name of the provisioned repository.
    pub fn repository_name(&self) -> Result<String, eyre::Report> {
        let result = self.result()?;
        result
            .repo_url
            .rsplit('/')
            .next()
            .map(str::to_owned)
            .ok_or_else(|| eyre::eyre!("repository URL {} has no path", result.repo_url))
    }
}

impl Default for ProvisioningWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ProvisioningWorld {
    ProvisioningWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
