//! Repository-hosting provider port.

use crate::provisioning::domain::{CommitRef, RepoRef};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Repository-hosting capabilities used by the provisioning pipeline.
///
/// Every call is a single authenticated round-trip. Implementations must not
/// retry internally: a retried create or write could duplicate repositories
/// or commits.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    /// Creates a new public repository.
    async fn create_repository(&self, name: &str, description: &str) -> ProviderResult<RepoRef>;

    /// Writes one file as an independent commit.
    async fn write_file(
        &self,
        repository: &RepoRef,
        path: &str,
        content: &str,
        message: &str,
    ) -> ProviderResult<()>;

    /// Enables static hosting from the primary branch root.
    async fn enable_static_hosting(&self, repository: &RepoRef) -> ProviderResult<()>;

    /// Lists commits, most recent first.
    async fn list_commits(&self, repository: &RepoRef) -> ProviderResult<Vec<CommitRef>>;
}

/// Errors returned by provider adapters.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The provider answered with a non-success status.
    #[error("provider rejected the request with status {status}: {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Message reported by the provider.
        message: String,
    },

    /// The provider answered with a body that could not be interpreted.
    #[error("provider returned an unexpected response: {0}")]
    InvalidResponse(String),

    /// The adapter could not be configured.
    #[error("provider client misconfigured: {0}")]
    Misconfigured(String),

    /// Network or runtime failure.
    #[error("provider transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProviderError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Creates a rejection error.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }
}
