//! Content generator port.

use crate::provisioning::domain::{DecodedAttachment, GeneratedFileSet, ProjectIdentifier};
use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

/// Inputs handed to a content generator.
#[derive(Debug, Clone, Copy)]
pub struct GenerationInput<'a> {
    /// Project the content is generated for.
    pub project: &'a ProjectIdentifier,
    /// Natural-language description of the application.
    pub brief: &'a str,
    /// Attachments with decoded payloads.
    pub attachments: &'a [DecodedAttachment],
    /// Opaque acceptance checks.
    pub checks: &'a [Value],
    /// Time the request was accepted.
    pub issued_at: DateTime<Utc>,
}

/// Side-effect-free mapping from a brief to a file set.
pub trait ContentGenerator: Send + Sync {
    /// Generates the files for a project.
    ///
    /// # Errors
    ///
    /// Returns [`ContentGenerationError`] when a template cannot be rendered.
    fn generate(
        &self,
        input: &GenerationInput<'_>,
    ) -> Result<GeneratedFileSet, ContentGenerationError>;
}

/// Errors returned by content generators.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContentGenerationError {
    /// A template failed to render.
    #[error("failed to render template '{template}': {reason}")]
    TemplateRender {
        /// Template name.
        template: String,
        /// Renderer diagnostic.
        reason: String,
    },
}
