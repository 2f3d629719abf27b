//! Shared state for request handlers.

use crate::provisioning::services::TaskProcessor;
use mockable::Clock;
use std::sync::Arc;

/// Handler state shared across requests.
#[derive(Clone)]
pub struct AppState {
    /// Pipeline that handles task submissions.
    pub processor: Arc<dyn TaskProcessor>,
    /// Clock used for health timestamps.
    pub clock: Arc<dyn Clock + Send + Sync>,
}

impl AppState {
    /// Creates handler state.
    #[must_use]
    pub const fn new(
        processor: Arc<dyn TaskProcessor>,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        Self { processor, clock }
    }
}
