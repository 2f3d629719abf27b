//! Port contracts for task provisioning.
//!
//! Ports define infrastructure-agnostic interfaces used by provisioning
//! services.

pub mod delivery;
pub mod generator;
pub mod provider;

pub use delivery::{
    CallbackError, CallbackTransport, DeliveryFailure, DeliveryOutcome, DeliveryStatus,
    ResultNotifier,
};
pub use generator::{ContentGenerationError, ContentGenerator, GenerationInput};
#[cfg(test)]
pub use provider::MockRepositoryProvider;
pub use provider::{ProviderError, ProviderResult, RepositoryProvider};
