//! Adapter implementations for provisioning ports.

pub mod callback;
pub mod github;
pub mod memory;

pub use callback::ReqwestCallbackTransport;
pub use github::{DEFAULT_GITHUB_API_URL, GitHubProvider, GitHubSettings};
pub use memory::{
    InMemoryCallbackTransport, InMemoryRepositoryProvider, ProviderCall, ProviderOperation,
    RecordingNotifier,
};
