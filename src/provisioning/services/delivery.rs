//! Retrying result delivery.

use crate::provisioning::{
    domain::ProvisioningResult,
    ports::{CallbackTransport, DeliveryOutcome, ResultNotifier},
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

const DEFAULT_MAX_ATTEMPTS: u32 = 5;
const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Bounded exponential backoff policy.
///
/// The wait after failed attempt `n` (1-based) is `base_delay * 2^(n-1)`.
/// No wait follows the final attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy. A `max_attempts` of zero is treated as one.
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Creates a policy that retries without waiting.
    #[must_use]
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    /// Returns the total number of attempts.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the delay before the first retry.
    #[must_use]
    pub const fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Returns the wait after the given failed attempt.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let factor = 2_u32.checked_pow(exponent).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY)
    }
}

/// Notifier that retries a [`CallbackTransport`] under a [`RetryPolicy`].
///
/// Failures are logged and reported through [`DeliveryOutcome`]; they are
/// never raised to the caller.
#[derive(Clone)]
pub struct RetryingNotifier<T>
where
    T: CallbackTransport,
{
    transport: Arc<T>,
    policy: RetryPolicy,
}

impl<T> RetryingNotifier<T>
where
    T: CallbackTransport,
{
    /// Creates a retrying notifier.
    #[must_use]
    pub const fn new(transport: Arc<T>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }
}

#[async_trait]
impl<T> ResultNotifier for RetryingNotifier<T>
where
    T: CallbackTransport,
{
    async fn notify(&self, url: &str, result: &ProvisioningResult) -> DeliveryOutcome {
        let payload = match serde_json::to_value(result) {
            Ok(payload) => payload,
            Err(err) => {
                error!(url, error = %err, "result payload could not be serialized");
                return DeliveryOutcome::exhausted(url, 0, err.to_string());
            }
        };

        let max_attempts = self.policy.max_attempts();
        let mut last_error = String::new();
        for attempt in 1..=max_attempts {
            if attempt > 1 {
                tokio::time::sleep(self.policy.delay_after(attempt - 1)).await;
            }
            match self.transport.post_json(url, &payload).await {
                Ok(()) => {
                    info!(url, attempt, "result delivered");
                    return DeliveryOutcome::delivered(attempt);
                }
                Err(err) => {
                    warn!(
                        url,
                        attempt,
                        remaining = max_attempts - attempt,
                        error = %err,
                        "result delivery attempt failed"
                    );
                    last_error = err.to_string();
                }
            }
        }

        error!(url, attempts = max_attempts, error = %last_error, "result delivery exhausted");
        DeliveryOutcome::exhausted(url, max_attempts, last_error)
    }
}
