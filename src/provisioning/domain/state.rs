//! Provisioning progress aggregate and its state machine.

use super::{CommitRef, ProjectIdentifier, ProvisioningStateError, RepoRef};
use std::fmt;

/// Provisioning lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProvisioningState {
    /// The repository exists but holds no generated content yet.
    Created,
    /// Every generated file has been written.
    Pushed,
    /// Static hosting has been requested, successfully or not.
    HostingAttempted,
    /// The latest commit has been resolved.
    Resolved,
}

impl ProvisioningState {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Pushed => "pushed",
            Self::HostingAttempted => "hosting_attempted",
            Self::Resolved => "resolved",
        }
    }

    /// Returns `true` when moving from `self` to `target` follows the
    /// provisioning order.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Created, Self::Pushed)
                | (Self::Pushed, Self::HostingAttempted)
                | (Self::HostingAttempted, Self::Resolved)
        )
    }

    /// Returns `true` for the final state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved)
    }
}

impl fmt::Display for ProvisioningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress of one request through the provider workflow.
///
/// Starts at [`ProvisioningState::Created`] once the repository exists and
/// only moves forward through [`ProvisioningState::can_transition_to`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningProgress {
    project: ProjectIdentifier,
    repository: RepoRef,
    state: ProvisioningState,
    files_written: usize,
    hosting_enabled: Option<bool>,
    commit: Option<CommitRef>,
}

impl ProvisioningProgress {
    /// Starts tracking a freshly created repository.
    #[must_use]
    pub const fn created(project: ProjectIdentifier, repository: RepoRef) -> Self {
        Self {
            project,
            repository,
            state: ProvisioningState::Created,
            files_written: 0,
            hosting_enabled: None,
            commit: None,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn project(&self) -> &ProjectIdentifier {
        &self.project
    }

    /// Returns the repository being provisioned.
    #[must_use]
    pub const fn repository(&self) -> &RepoRef {
        &self.repository
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> ProvisioningState {
        self.state
    }

    /// Returns the number of files written by the push step.
    #[must_use]
    pub const fn files_written(&self) -> usize {
        self.files_written
    }

    /// Returns whether hosting was enabled, or `None` before the attempt.
    #[must_use]
    pub const fn hosting_enabled(&self) -> Option<bool> {
        self.hosting_enabled
    }

    /// Returns the resolved commit, if any.
    #[must_use]
    pub const fn commit(&self) -> Option<&CommitRef> {
        self.commit.as_ref()
    }

    /// Records that every file was written.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningStateError::InvalidTransition`] unless the
    /// current state is [`ProvisioningState::Created`].
    pub fn mark_pushed(&mut self, files_written: usize) -> Result<(), ProvisioningStateError> {
        self.transition_to(ProvisioningState::Pushed)?;
        self.files_written = files_written;
        Ok(())
    }

    /// Records the outcome of the hosting request.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningStateError::InvalidTransition`] unless the
    /// current state is [`ProvisioningState::Pushed`].
    pub fn mark_hosting_attempted(&mut self, enabled: bool) -> Result<(), ProvisioningStateError> {
        self.transition_to(ProvisioningState::HostingAttempted)?;
        self.hosting_enabled = Some(enabled);
        Ok(())
    }

    /// Records the resolved latest commit.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningStateError::InvalidTransition`] unless the
    /// current state is [`ProvisioningState::HostingAttempted`].
    pub fn mark_resolved(&mut self, commit: CommitRef) -> Result<(), ProvisioningStateError> {
        self.transition_to(ProvisioningState::Resolved)?;
        self.commit = Some(commit);
        Ok(())
    }

    fn transition_to(&mut self, target: ProvisioningState) -> Result<(), ProvisioningStateError> {
        if !self.state.can_transition_to(target) {
            return Err(ProvisioningStateError::InvalidTransition {
                project: self.project.clone(),
                from: self.state,
                to: target,
            });
        }
        self.state = target;
        Ok(())
    }
}
