//! HTTP callback transport.

use crate::provisioning::ports::{CallbackError, CallbackTransport};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts result payloads with `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestCallbackTransport {
    client: Client,
    attempt_timeout: Duration,
}

impl ReqwestCallbackTransport {
    /// Creates a transport around an existing client.
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self {
            client,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    /// Overrides the timeout applied to each attempt.
    #[must_use]
    pub const fn with_attempt_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }
}

impl Default for ReqwestCallbackTransport {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

#[async_trait]
impl CallbackTransport for ReqwestCallbackTransport {
    async fn post_json(&self, url: &str, payload: &Value) -> Result<(), CallbackError> {
        let response = self
            .client
            .post(url)
            .timeout(self.attempt_timeout)
            .json(payload)
            .send()
            .await
            .map_err(CallbackError::transport)?;
        let status = response.status();
        debug!(url, status = status.as_u16(), "callback response");
        if status.is_success() {
            Ok(())
        } else {
            Err(CallbackError::Status(status.as_u16()))
        }
    }
}
