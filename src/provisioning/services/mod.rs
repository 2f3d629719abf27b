//! Application services for task provisioning.

mod delivery;
mod orchestrator;

pub use delivery::{RetryPolicy, RetryingNotifier};
pub use orchestrator::{
    AuthorizationError, NonFatalHostingError, OrchestratorSettings, ProvisioningError,
    ProvisioningStep, TaskOrchestrator, TaskProcessingError, TaskProcessingResult, TaskProcessor,
};
