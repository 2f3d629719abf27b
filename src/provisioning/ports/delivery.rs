//! Result delivery ports.
//!
//! [`ResultNotifier`] is what the orchestrator calls; it never fails outward.
//! [`CallbackTransport`] performs a single delivery attempt and is the seam
//! retrying notifiers are built on.

use crate::provisioning::domain::ProvisioningResult;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Delivers provisioning results to a caller-supplied URL.
#[async_trait]
pub trait ResultNotifier: Send + Sync {
    /// Delivers the result and reports how delivery went.
    async fn notify(&self, url: &str, result: &ProvisioningResult) -> DeliveryOutcome;
}

/// Performs one JSON POST to a callback URL.
#[async_trait]
pub trait CallbackTransport: Send + Sync {
    /// Posts the payload once.
    ///
    /// # Errors
    ///
    /// Returns [`CallbackError`] on a transport failure or a non-success
    /// status.
    async fn post_json(&self, url: &str, payload: &Value) -> Result<(), CallbackError>;
}

/// Errors from a single callback attempt.
#[derive(Debug, Clone, Error)]
pub enum CallbackError {
    /// The callback answered with a non-success status.
    #[error("callback answered with status {0}")]
    Status(u16),

    /// Network or client failure.
    #[error("callback transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl CallbackError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}

/// Terminal delivery failure after every attempt was used.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("delivery to {url} failed after {attempts} attempts: {last_error}")]
pub struct DeliveryFailure {
    /// Callback URL.
    pub url: String,
    /// Number of attempts made.
    pub attempts: u32,
    /// Message of the final attempt's error.
    pub last_error: String,
}

/// Terminal state of a delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// The callback accepted the payload.
    Delivered,
    /// Every attempt failed.
    Exhausted(DeliveryFailure),
}

/// Attempt count and terminal status of one delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    attempts: u32,
    status: DeliveryStatus,
}

impl DeliveryOutcome {
    /// Creates a successful outcome.
    #[must_use]
    pub const fn delivered(attempts: u32) -> Self {
        Self {
            attempts,
            status: DeliveryStatus::Delivered,
        }
    }

    /// Creates a failed outcome.
    #[must_use]
    pub fn exhausted(url: impl Into<String>, attempts: u32, last_error: impl Into<String>) -> Self {
        Self {
            attempts,
            status: DeliveryStatus::Exhausted(DeliveryFailure {
                url: url.into(),
                attempts,
                last_error: last_error.into(),
            }),
        }
    }

    /// Returns the number of attempts made.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Returns the terminal status.
    #[must_use]
    pub const fn status(&self) -> &DeliveryStatus {
        &self.status
    }

    /// Returns `true` when the payload was delivered.
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self.status, DeliveryStatus::Delivered)
    }
}
