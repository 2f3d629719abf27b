//! Task orchestration service.
//!
//! Drives one request through authorization, content generation, and the
//! provider workflow, then hands the assembled result to a notifier. Steps
//! run strictly in order; each must finish or fail before the next starts.

use crate::provisioning::{
    domain::{
        CommitRef, DecodedAttachment, GeneratedFileSet, ProjectIdentifier, ProjectStamp,
        ProvisioningProgress, ProvisioningResult, ProvisioningStateError, PublishingTarget, RepoRef,
        TaskRequest,
    },
    ports::{
        ContentGenerationError, ContentGenerator, DeliveryStatus, GenerationInput, ProviderError,
        RepositoryProvider, ResultNotifier,
    },
};
use async_trait::async_trait;
use mockable::Clock;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// Secret and publishing target applied to every request.
#[derive(Clone, PartialEq, Eq)]
pub struct OrchestratorSettings {
    secret: String,
    target: PublishingTarget,
}

impl OrchestratorSettings {
    /// Creates orchestrator settings.
    #[must_use]
    pub fn new(secret: impl Into<String>, target: PublishingTarget) -> Self {
        Self {
            secret: secret.into(),
            target,
        }
    }

    /// Returns the publishing target.
    #[must_use]
    pub const fn target(&self) -> &PublishingTarget {
        &self.target
    }
}

impl fmt::Debug for OrchestratorSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrchestratorSettings")
            .field("secret", &"<redacted>")
            .field("target", &self.target)
            .finish()
    }
}

/// Caller supplied the wrong shared secret.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AuthorizationError {
    /// The secret did not match the configured secret.
    #[error("Invalid secret")]
    InvalidSecret,
}

/// Provider-facing step of the provisioning workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProvisioningStep {
    /// Repository creation.
    CreateRepository,
    /// Writing generated files.
    PushContent,
    /// Looking up the latest commit.
    ResolveCommit,
}

impl ProvisioningStep {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateRepository => "create repository",
            Self::PushContent => "push content",
            Self::ResolveCommit => "resolve latest commit",
        }
    }
}

impl fmt::Display for ProvisioningStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal provisioning failure. Side effects of earlier steps are not rolled
/// back.
#[derive(Debug, Error)]
pub enum ProvisioningError {
    /// The content generator failed.
    #[error(transparent)]
    Generation(#[from] ContentGenerationError),

    /// A fatal provider step failed.
    #[error("{step} failed for {project}: {source}")]
    Provider {
        /// Step that failed.
        step: ProvisioningStep,
        /// Project being provisioned.
        project: ProjectIdentifier,
        /// Provider error.
        source: ProviderError,
    },

    /// The repository reported no commits after content was pushed.
    #[error("repository {repository} has no commits")]
    NoCommits {
        /// Repository that was queried.
        repository: RepoRef,
    },

    /// Steps were driven out of order.
    #[error(transparent)]
    State(#[from] ProvisioningStateError),
}

/// Hosting could not be enabled; logged and otherwise ignored.
#[derive(Debug, Clone, Error)]
#[error("static hosting could not be enabled for {repository}: {source}")]
pub struct NonFatalHostingError {
    /// Repository the request targeted.
    pub repository: RepoRef,
    /// Provider error.
    pub source: ProviderError,
}

/// Error returned by [`TaskOrchestrator::process`].
///
/// The display form is the message reported to the HTTP caller.
#[derive(Debug, Error)]
pub enum TaskProcessingError {
    /// The request was rejected before any side effect.
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),
    /// A fatal provisioning step failed.
    #[error(transparent)]
    Provisioning(#[from] ProvisioningError),
}

/// Result type for task processing.
pub type TaskProcessingResult<T> = Result<T, TaskProcessingError>;

/// Object-safe entry point used by the HTTP surface.
#[async_trait]
pub trait TaskProcessor: Send + Sync {
    /// Processes one task request end to end.
    async fn process(&self, request: TaskRequest) -> TaskProcessingResult<ProvisioningResult>;
}

/// Task orchestration service.
#[derive(Clone)]
pub struct TaskOrchestrator<P, G, N, C>
where
    P: RepositoryProvider,
    G: ContentGenerator,
    N: ResultNotifier,
    C: Clock + Send + Sync,
{
    provider: Arc<P>,
    generator: Arc<G>,
    notifier: Arc<N>,
    clock: Arc<C>,
    settings: Arc<OrchestratorSettings>,
    stamp: Arc<ProjectStamp>,
}

impl<P, G, N, C> TaskOrchestrator<P, G, N, C>
where
    P: RepositoryProvider,
    G: ContentGenerator,
    N: ResultNotifier,
    C: Clock + Send + Sync,
{
    /// Creates a new orchestrator.
    #[must_use]
    pub fn new(
        provider: Arc<P>,
        generator: Arc<G>,
        notifier: Arc<N>,
        clock: Arc<C>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            provider,
            generator,
            notifier,
            clock,
            settings: Arc::new(settings),
            stamp: Arc::new(ProjectStamp::new()),
        }
    }

    /// Processes a task request.
    ///
    /// Delivery problems are logged and never change the returned value.
    ///
    /// # Errors
    ///
    /// Returns [`TaskProcessingError::Authorization`] when the secret does not
    /// match, before any provider call is made. Returns
    /// [`TaskProcessingError::Provisioning`] when generation, repository
    /// creation, content push, or commit resolution fails.
    pub async fn process(&self, request: TaskRequest) -> TaskProcessingResult<ProvisioningResult> {
        self.authorize(&request)?;

        let project = ProjectIdentifier::derive(&request.task, self.stamp.next(&*self.clock));
        info!(
            project = %project,
            task = %request.task,
            round = request.round,
            "processing task"
        );

        let files = self.generate(&project, &request)?;
        let mut progress = self.create_repository(&project, &request.brief).await?;
        self.push_content(&mut progress, &files).await?;
        self.attempt_hosting(&mut progress).await?;
        let commit = self.resolve_commit(&mut progress).await?;

        let result =
            ProvisioningResult::assemble(&request, self.settings.target(), &project, &commit);
        info!(
            project = %project,
            repo_url = %result.repo_url,
            pages_url = %result.pages_url,
            commit = %result.commit_sha,
            "task provisioned"
        );

        self.deliver(&project, &request.evaluation_url, &result).await;
        Ok(result)
    }

    fn authorize(&self, request: &TaskRequest) -> Result<(), AuthorizationError> {
        if request.secret != self.settings.secret {
            warn!(task = %request.task, "rejected task with invalid secret");
            return Err(AuthorizationError::InvalidSecret);
        }
        Ok(())
    }

    fn generate(
        &self,
        project: &ProjectIdentifier,
        request: &TaskRequest,
    ) -> Result<GeneratedFileSet, ProvisioningError> {
        let attachments: Vec<DecodedAttachment> = request
            .attachments
            .iter()
            .map(DecodedAttachment::from_attachment)
            .collect();
        let input = GenerationInput {
            project,
            brief: &request.brief,
            attachments: &attachments,
            checks: &request.checks,
            issued_at: self.clock.utc(),
        };
        let files = self.generator.generate(&input)?;
        info!(project = %project, files = files.len(), "generated content");
        Ok(files)
    }

    async fn create_repository(
        &self,
        project: &ProjectIdentifier,
        description: &str,
    ) -> Result<ProvisioningProgress, ProvisioningError> {
        let repository = self
            .provider
            .create_repository(project.as_str(), description)
            .await
            .map_err(|source| {
                provider_failure(ProvisioningStep::CreateRepository, project, source)
            })?;
        info!(project = %project, repository = %repository, "created repository");
        Ok(ProvisioningProgress::created(project.clone(), repository))
    }

    async fn push_content(
        &self,
        progress: &mut ProvisioningProgress,
        files: &GeneratedFileSet,
    ) -> Result<(), ProvisioningError> {
        for file in files {
            let message = format!("Add {}", file.path());
            self.provider
                .write_file(progress.repository(), file.path(), file.content(), &message)
                .await
                .map_err(|source| {
                    provider_failure(ProvisioningStep::PushContent, progress.project(), source)
                })?;
        }
        progress.mark_pushed(files.len())?;
        info!(
            project = %progress.project(),
            files = progress.files_written(),
            "pushed content"
        );
        Ok(())
    }

    async fn attempt_hosting(
        &self,
        progress: &mut ProvisioningProgress,
    ) -> Result<(), ProvisioningError> {
        let enabled = match self.provider.enable_static_hosting(progress.repository()).await {
            Ok(()) => true,
            Err(source) => {
                let failure = NonFatalHostingError {
                    repository: progress.repository().clone(),
                    source,
                };
                warn!(
                    project = %progress.project(),
                    error = %failure,
                    "continuing without static hosting"
                );
                false
            }
        };
        progress.mark_hosting_attempted(enabled)?;
        Ok(())
    }

    async fn resolve_commit(
        &self,
        progress: &mut ProvisioningProgress,
    ) -> Result<CommitRef, ProvisioningError> {
        let commits = self
            .provider
            .list_commits(progress.repository())
            .await
            .map_err(|source| {
                provider_failure(ProvisioningStep::ResolveCommit, progress.project(), source)
            })?;
        let latest = commits
            .into_iter()
            .next()
            .ok_or_else(|| ProvisioningError::NoCommits {
                repository: progress.repository().clone(),
            })?;
        progress.mark_resolved(latest.clone())?;
        Ok(latest)
    }

    async fn deliver(&self, project: &ProjectIdentifier, url: &str, result: &ProvisioningResult) {
        let outcome = self.notifier.notify(url, result).await;
        match outcome.status() {
            DeliveryStatus::Delivered => {
                info!(project = %project, attempts = outcome.attempts(), "result delivered");
            }
            DeliveryStatus::Exhausted(failure) => {
                error!(project = %project, error = %failure, "result delivery failed");
            }
        }
    }
}

#[async_trait]
impl<P, G, N, C> TaskProcessor for TaskOrchestrator<P, G, N, C>
where
    P: RepositoryProvider,
    G: ContentGenerator,
    N: ResultNotifier,
    C: Clock + Send + Sync,
{
    async fn process(&self, request: TaskRequest) -> TaskProcessingResult<ProvisioningResult> {
        Self::process(self, request).await
    }
}

fn provider_failure(
    step: ProvisioningStep,
    project: &ProjectIdentifier,
    source: ProviderError,
) -> ProvisioningError {
    error!(project = %project, step = %step, error = %source, "provisioning step failed");
    ProvisioningError::Provider {
        step,
        project: project.clone(),
        source,
    }
}
