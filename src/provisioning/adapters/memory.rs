//! In-memory adapters for provisioning tests and local runs.

use crate::provisioning::{
    domain::{CommitRef, ProvisioningResult, RepoRef},
    ports::{
        CallbackError, CallbackTransport, DeliveryOutcome, ProviderError, ProviderResult,
        RepositoryProvider, ResultNotifier,
    },
};
use async_trait::async_trait;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

/// Provider operations that can be scripted to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderOperation {
    /// `create_repository`.
    CreateRepository,
    /// `write_file`.
    WriteFile,
    /// `enable_static_hosting`.
    EnableStaticHosting,
    /// `list_commits`.
    ListCommits,
}

/// A call observed by [`InMemoryRepositoryProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    /// A repository creation request.
    CreateRepository {
        /// Requested name.
        name: String,
        /// Requested description.
        description: String,
    },
    /// A file write.
    WriteFile {
        /// Target repository.
        repository: RepoRef,
        /// File path.
        path: String,
        /// Commit message.
        message: String,
    },
    /// A hosting activation.
    EnableStaticHosting {
        /// Target repository.
        repository: RepoRef,
    },
    /// A commit listing.
    ListCommits {
        /// Target repository.
        repository: RepoRef,
    },
}

impl ProviderCall {
    /// Returns the operation this call exercised.
    #[must_use]
    pub const fn operation(&self) -> ProviderOperation {
        match self {
            Self::CreateRepository { .. } => ProviderOperation::CreateRepository,
            Self::WriteFile { .. } => ProviderOperation::WriteFile,
            Self::EnableStaticHosting { .. } => ProviderOperation::EnableStaticHosting,
            Self::ListCommits { .. } => ProviderOperation::ListCommits,
        }
    }
}

/// Thread-safe in-memory repository provider.
///
/// Every successful write appends a commit whose hash is derived from the
/// repository, path, content, and position, so runs are reproducible.
#[derive(Debug, Clone)]
pub struct InMemoryRepositoryProvider {
    owner: String,
    state: Arc<Mutex<InMemoryProviderState>>,
}

#[derive(Debug, Default)]
struct InMemoryProviderState {
    calls: Vec<ProviderCall>,
    repositories: HashMap<String, HostedRepository>,
    failures: HashMap<ProviderOperation, String>,
    omit_commits: bool,
}

#[derive(Debug, Default)]
struct HostedRepository {
    files: BTreeMap<String, String>,
    commits: Vec<CommitRef>,
    hosting_enabled: bool,
}

impl InMemoryRepositoryProvider {
    /// Creates an empty provider for the given account.
    #[must_use]
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            state: Arc::new(Mutex::new(InMemoryProviderState::default())),
        }
    }

    /// Makes every later call to `operation` fail with `message`.
    pub fn fail_on(&self, operation: ProviderOperation, message: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.failures.insert(operation, message.into());
        }
    }

    /// Makes commit listings return no entries.
    pub fn omit_commits(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.omit_commits = true;
        }
    }

    /// Returns every call observed so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.state
            .lock()
            .map(|state| state.calls.clone())
            .unwrap_or_default()
    }

    /// Returns the operations observed so far, in order.
    #[must_use]
    pub fn operations(&self) -> Vec<ProviderOperation> {
        self.calls().iter().map(ProviderCall::operation).collect()
    }

    /// Returns the files stored in a repository, keyed by path.
    #[must_use]
    pub fn files(&self, name: &str) -> Option<BTreeMap<String, String>> {
        let state = self.state.lock().ok()?;
        state.repositories.get(name).map(|repo| repo.files.clone())
    }

    /// Returns whether hosting was enabled for a repository.
    #[must_use]
    pub fn hosting_enabled(&self, name: &str) -> bool {
        self.state
            .lock()
            .ok()
            .and_then(|state| state.repositories.get(name).map(|repo| repo.hosting_enabled))
            .unwrap_or(false)
    }

    /// Returns the names of all created repositories.
    #[must_use]
    pub fn repository_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .state
            .lock()
            .map(|state| state.repositories.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    fn lock(&self) -> ProviderResult<MutexGuard<'_, InMemoryProviderState>> {
        self.state
            .lock()
            .map_err(|err| ProviderError::transport(std::io::Error::other(err.to_string())))
    }
}

fn scripted_failure(
    state: &InMemoryProviderState,
    operation: ProviderOperation,
) -> ProviderResult<()> {
    state
        .failures
        .get(&operation)
        .map_or(Ok(()), |message| Err(ProviderError::rejected(500, message.clone())))
}

fn hosted<'a>(
    state: &'a mut InMemoryProviderState,
    repository: &RepoRef,
) -> ProviderResult<&'a mut HostedRepository> {
    state
        .repositories
        .get_mut(repository.name())
        .ok_or_else(|| ProviderError::rejected(404, "Not Found"))
}

fn commit_hash(repository: &RepoRef, path: &str, content: &str, sequence: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(repository.to_string().as_bytes());
    hasher.update(path.as_bytes());
    hasher.update(content.as_bytes());
    hasher.update(sequence.to_string().as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest.get(..20).unwrap_or_default())
}

#[async_trait]
impl RepositoryProvider for InMemoryRepositoryProvider {
    async fn create_repository(&self, name: &str, description: &str) -> ProviderResult<RepoRef> {
        let mut state = self.lock()?;
        state.calls.push(ProviderCall::CreateRepository {
            name: name.to_owned(),
            description: description.to_owned(),
        });
        scripted_failure(&state, ProviderOperation::CreateRepository)?;
        if state.repositories.contains_key(name) {
            return Err(ProviderError::rejected(
                422,
                "name already exists on this account",
            ));
        }
        state
            .repositories
            .insert(name.to_owned(), HostedRepository::default());
        Ok(RepoRef::new(self.owner.clone(), name))
    }

    async fn write_file(
        &self,
        repository: &RepoRef,
        path: &str,
        content: &str,
        message: &str,
    ) -> ProviderResult<()> {
        let mut state = self.lock()?;
        state.calls.push(ProviderCall::WriteFile {
            repository: repository.clone(),
            path: path.to_owned(),
            message: message.to_owned(),
        });
        scripted_failure(&state, ProviderOperation::WriteFile)?;
        let hosted_repo = hosted(&mut state, repository)?;
        let sha = commit_hash(repository, path, content, hosted_repo.commits.len());
        hosted_repo
            .files
            .insert(path.to_owned(), content.to_owned());
        hosted_repo.commits.push(CommitRef::new(sha));
        Ok(())
    }

    async fn enable_static_hosting(&self, repository: &RepoRef) -> ProviderResult<()> {
        let mut state = self.lock()?;
        state.calls.push(ProviderCall::EnableStaticHosting {
            repository: repository.clone(),
        });
        scripted_failure(&state, ProviderOperation::EnableStaticHosting)?;
        hosted(&mut state, repository)?.hosting_enabled = true;
        Ok(())
    }

    async fn list_commits(&self, repository: &RepoRef) -> ProviderResult<Vec<CommitRef>> {
        let mut state = self.lock()?;
        state.calls.push(ProviderCall::ListCommits {
            repository: repository.clone(),
        });
        scripted_failure(&state, ProviderOperation::ListCommits)?;
        let omit = state.omit_commits;
        let hosted_repo = hosted(&mut state, repository)?;
        if omit {
            return Ok(Vec::new());
        }
        Ok(hosted_repo.commits.iter().rev().cloned().collect())
    }
}

/// Notifier that records results instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    deliveries: Arc<Mutex<Vec<(String, ProvisioningResult)>>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded `(url, result)` pairs.
    #[must_use]
    pub fn deliveries(&self) -> Vec<(String, ProvisioningResult)> {
        self.deliveries
            .lock()
            .map(|deliveries| deliveries.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ResultNotifier for RecordingNotifier {
    async fn notify(&self, url: &str, result: &ProvisioningResult) -> DeliveryOutcome {
        match self.deliveries.lock() {
            Ok(mut deliveries) => {
                deliveries.push((url.to_owned(), result.clone()));
                DeliveryOutcome::delivered(1)
            }
            Err(err) => DeliveryOutcome::exhausted(url, 1, err.to_string()),
        }
    }
}

/// Callback transport that fails a scripted number of times.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCallbackTransport {
    state: Arc<Mutex<CallbackState>>,
}

#[derive(Debug, Default)]
struct CallbackState {
    failures_remaining: Option<u32>,
    attempts: u32,
    received: Vec<(String, Value)>,
}

impl InMemoryCallbackTransport {
    /// Creates a transport that accepts every payload.
    #[must_use]
    pub fn accepting() -> Self {
        Self::failing_first(0)
    }

    /// Creates a transport that rejects the first `failures` attempts.
    #[must_use]
    pub fn failing_first(failures: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(CallbackState {
                failures_remaining: Some(failures),
                ..CallbackState::default()
            })),
        }
    }

    /// Creates a transport that rejects every attempt.
    #[must_use]
    pub fn rejecting() -> Self {
        Self::default()
    }

    /// Returns the number of attempts made.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.state.lock().map(|state| state.attempts).unwrap_or(0)
    }

    /// Returns the accepted `(url, payload)` pairs.
    #[must_use]
    pub fn received(&self) -> Vec<(String, Value)> {
        self.state
            .lock()
            .map(|state| state.received.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CallbackTransport for InMemoryCallbackTransport {
    async fn post_json(&self, url: &str, payload: &Value) -> Result<(), CallbackError> {
        let mut state = self
            .state
            .lock()
            .map_err(|err| CallbackError::transport(std::io::Error::other(err.to_string())))?;
        state.attempts += 1;
        match state.failures_remaining {
            Some(0) => {
                state.received.push((url.to_owned(), payload.clone()));
                Ok(())
            }
            Some(remaining) => {
                state.failures_remaining = Some(remaining - 1);
                Err(CallbackError::Status(503))
            }
            None => Err(CallbackError::Status(503)),
        }
    }
}
