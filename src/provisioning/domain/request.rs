//! Inbound task request payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Task submitted by a caller for provisioning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRequest {
    /// Identity or contact string of the caller.
    pub email: String,
    /// Shared secret compared against the configured server secret.
    pub secret: String,
    /// Caller-chosen task identifier.
    pub task: String,
    /// Round number of the task.
    pub round: u32,
    /// Opaque replay or ordering token echoed back in the result.
    pub nonce: String,
    /// Natural-language description of the application to generate.
    pub brief: String,
    /// Acceptance checks; opaque to the pipeline.
    #[serde(default)]
    pub checks: Vec<Value>,
    /// Callback URL receiving the provisioning result.
    pub evaluation_url: String,
    /// Files supplied with the brief.
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Attachment supplied with a task request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// File name of the attachment.
    pub name: String,
    /// Location of the attachment, usually a `data:` URI.
    #[serde(default)]
    pub url: String,
}

impl Attachment {
    /// Creates an attachment.
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}
