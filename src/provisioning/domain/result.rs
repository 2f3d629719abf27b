//! Publishing locations and the caller-facing provisioning result.

use super::{CommitRef, ProjectIdentifier, TaskRequest};
use serde::{Deserialize, Serialize};

/// Account and hosts used to compute repository and static-site URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishingTarget {
    owner: String,
    vcs_host: String,
    pages_host: String,
}

impl PublishingTarget {
    /// Creates a publishing target.
    #[must_use]
    pub fn new(
        owner: impl Into<String>,
        vcs_host: impl Into<String>,
        pages_host: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            vcs_host: vcs_host.into(),
            pages_host: pages_host.into(),
        }
    }

    /// Returns the owning account.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns `https://<host>/<owner>/<project>`.
    #[must_use]
    pub fn repository_url(&self, project: &ProjectIdentifier) -> String {
        format!("https://{}/{}/{project}", self.vcs_host, self.owner)
    }

    /// Returns `https://<owner>.<pages-host>/<project>/`.
    ///
    /// The URL is computed, not verified against the provider.
    #[must_use]
    pub fn pages_url(&self, project: &ProjectIdentifier) -> String {
        format!("https://{}.{}/{project}/", self.owner, self.pages_host)
    }
}

/// Result reported to the caller once every provisioning step succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningResult {
    /// Identity or contact string from the request.
    pub email: String,
    /// Task identifier from the request.
    pub task: String,
    /// Round number from the request.
    pub round: u32,
    /// Nonce from the request.
    pub nonce: String,
    /// Repository URL.
    pub repo_url: String,
    /// Hash of the latest commit.
    pub commit_sha: String,
    /// Static-site URL.
    pub pages_url: String,
}

impl ProvisioningResult {
    /// Assembles a result from the request, the target, and the resolved
    /// commit.
    #[must_use]
    pub fn assemble(
        request: &TaskRequest,
        target: &PublishingTarget,
        project: &ProjectIdentifier,
        commit: &CommitRef,
    ) -> Self {
        Self {
            email: request.email.clone(),
            task: request.task.clone(),
            round: request.round,
            nonce: request.nonce.clone(),
            repo_url: target.repository_url(project),
            commit_sha: commit.sha().to_owned(),
            pages_url: target.pages_url(project),
        }
    }
}
