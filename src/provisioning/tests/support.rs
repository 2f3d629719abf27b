//! Shared builders for provisioning unit tests.

use crate::provisioning::{
    domain::{Attachment, PublishingTarget, TaskRequest},
    services::OrchestratorSettings,
};
use serde_json::json;

pub const SECRET: &str = "correct-horse";
pub const OWNER: &str = "octo";
pub const CALLBACK_URL: &str = "https://evaluator.example.test/notify";

pub fn publishing_target() -> PublishingTarget {
    PublishingTarget::new(OWNER, "github.com", "github.io")
}

pub fn settings() -> OrchestratorSettings {
    OrchestratorSettings::new(SECRET, publishing_target())
}

pub fn task_request(task: &str, secret: &str) -> TaskRequest {
    TaskRequest {
        email: "student@example.test".to_owned(),
        secret: secret.to_owned(),
        task: task.to_owned(),
        round: 1,
        nonce: "nonce-123".to_owned(),
        brief: "Summarize sales from data.csv".to_owned(),
        checks: vec![json!("Page shows the total")],
        evaluation_url: CALLBACK_URL.to_owned(),
        attachments: vec![Attachment::new(
            "data.csv",
            "data:text/csv;base64,UHJvZHVjdCxTYWxlcwpXaWRnZXQsMTAwCkdhZGdldCw1MA==",
        )],
    }
}
