//! Template-driven static site generation.
//!
//! [`TemplateContentGenerator`] picks a page template from the brief with a
//! prioritized keyword list, renders it with `minijinja`, and adds a README
//! and an MIT licence. Output is deterministic for a given input.

mod matcher;
mod sales;

pub use matcher::{DEFAULT_MATCHERS, TemplateKind, TemplateMatcher, select_template};
pub use sales::SalesTotal;

use crate::provisioning::{
    domain::{DecodedAttachment, GeneratedFileSet},
    ports::{ContentGenerationError, ContentGenerator, GenerationInput},
};
use chrono::Datelike;
use minijinja::{Environment, Value};
use serde::Serialize;
use serde_json::Value as JsonValue;
use sha2::{Digest, Sha256};

/// Copyright holder used when none is configured.
pub const DEFAULT_COPYRIGHT_HOLDER: &str = "Student";

/// Characters of each attachment shown by the generic page.
pub const PREVIEW_LIMIT: usize = 500;

const CAPTCHA_TEMPLATE: &str = include_str!("templates/captcha.html");
const SALES_TEMPLATE: &str = include_str!("templates/sales.html");
const MARKDOWN_TEMPLATE: &str = include_str!("templates/markdown.html");
const GITHUB_TEMPLATE: &str = include_str!("templates/github.html");
const GENERIC_TEMPLATE: &str = include_str!("templates/generic.html");
const README_TEMPLATE: &str = include_str!("templates/README.md.j2");
const LICENSE_TEMPLATE: &str = include_str!("templates/LICENSE.j2");

/// Generates an `index.html`, `README.md`, and `LICENSE` from a brief.
pub struct TemplateContentGenerator {
    environment: Environment<'static>,
    copyright_holder: String,
}

#[derive(Debug, Serialize)]
struct SalesContext<'a> {
    csv: &'a str,
    total: String,
}

#[derive(Debug, Serialize)]
struct MarkdownContext<'a> {
    markdown: &'a str,
}

#[derive(Debug, Serialize)]
struct GitHubContext {
    seed: String,
}

#[derive(Debug, Serialize)]
struct GenericContext<'a> {
    brief: &'a str,
    attachments: Vec<AttachmentPreview<'a>>,
}

#[derive(Debug, Serialize)]
struct AttachmentPreview<'a> {
    name: &'a str,
    mime_type: &'a str,
    preview: String,
}

#[derive(Debug, Serialize)]
struct ReadmeContext {
    quoted_brief: String,
    checks: Vec<String>,
}

#[derive(Debug, Serialize)]
struct LicenseContext<'a> {
    year: i32,
    holder: &'a str,
}

impl TemplateContentGenerator {
    /// Creates a generator that signs the licence for `copyright_holder`.
    #[must_use]
    pub fn new(copyright_holder: impl Into<String>) -> Self {
        let mut environment = Environment::new();
        environment.add_filter("js_literal", js_literal);
        Self {
            environment,
            copyright_holder: copyright_holder.into(),
        }
    }

    fn render<S: Serialize>(
        &self,
        name: &'static str,
        source: &'static str,
        context: S,
    ) -> Result<String, ContentGenerationError> {
        self.environment
            .render_named_str(name, source, context)
            .map_err(|error| ContentGenerationError::TemplateRender {
                template: name.to_owned(),
                reason: error.to_string(),
            })
    }

    fn render_index(&self, input: &GenerationInput<'_>) -> Result<String, ContentGenerationError> {
        let kind = select_template(input.brief);
        let name = kind.template_name();
        match kind {
            TemplateKind::Captcha => self.render(name, CAPTCHA_TEMPLATE, ()),
            TemplateKind::SalesSummary => {
                let csv = last_with_extension(input.attachments, "csv");
                let context = SalesContext {
                    csv,
                    total: SalesTotal::from_csv(csv).to_string(),
                };
                self.render(name, SALES_TEMPLATE, context)
            }
            TemplateKind::MarkdownViewer => {
                let context = MarkdownContext {
                    markdown: last_with_extension(input.attachments, "md"),
                };
                self.render(name, MARKDOWN_TEMPLATE, context)
            }
            TemplateKind::GitHubLookup => {
                let context = GitHubContext {
                    seed: form_seed(input.project.as_str()),
                };
                self.render(name, GITHUB_TEMPLATE, context)
            }
            TemplateKind::Generic => {
                let context = GenericContext {
                    brief: input.brief,
                    attachments: input.attachments.iter().map(preview).collect(),
                };
                self.render(name, GENERIC_TEMPLATE, context)
            }
        }
    }

    fn render_readme(&self, input: &GenerationInput<'_>) -> Result<String, ContentGenerationError> {
        let context = ReadmeContext {
            quoted_brief: quote_block(input.brief),
            checks: input.checks.iter().map(describe_check).collect(),
        };
        self.render("README.md.j2", README_TEMPLATE, context)
    }

    fn render_license(
        &self,
        input: &GenerationInput<'_>,
    ) -> Result<String, ContentGenerationError> {
        let context = LicenseContext {
            year: input.issued_at.year(),
            holder: &self.copyright_holder,
        };
        self.render("LICENSE.j2", LICENSE_TEMPLATE, context)
    }
}

impl Default for TemplateContentGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_COPYRIGHT_HOLDER)
    }
}

impl ContentGenerator for TemplateContentGenerator {
    fn generate(
        &self,
        input: &GenerationInput<'_>,
    ) -> Result<GeneratedFileSet, ContentGenerationError> {
        Ok(GeneratedFileSet::new()
            .with_file("index.html", self.render_index(input)?)
            .with_file("README.md", self.render_readme(input)?)
            .with_file("LICENSE", self.render_license(input)?))
    }
}

/// Escapes text for embedding inside a JavaScript template literal.
///
/// Backslashes, backticks, and `${` are escaped; everything else is kept.
#[must_use]
pub fn escape_js_template_literal(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

fn js_literal(text: &str) -> Value {
    Value::from_safe_string(escape_js_template_literal(text))
}

fn last_with_extension<'a>(attachments: &'a [DecodedAttachment], extension: &str) -> &'a str {
    attachments
        .iter()
        .rev()
        .find(|attachment| attachment.has_extension(extension))
        .map_or("", |attachment| attachment.content.as_str())
}

fn preview(attachment: &DecodedAttachment) -> AttachmentPreview<'_> {
    let mut chars = attachment.content.chars();
    let mut text: String = chars.by_ref().take(PREVIEW_LIMIT).collect();
    if chars.next().is_some() {
        text.push_str("...");
    }
    AttachmentPreview {
        name: &attachment.name,
        mime_type: &attachment.mime_type,
        preview: text,
    }
}

fn form_seed(project: &str) -> String {
    let digest = Sha256::digest(project.as_bytes());
    hex::encode(digest.get(..5).unwrap_or_default())
}

fn quote_block(text: &str) -> String {
    if text.is_empty() {
        return ">".to_owned();
    }
    text.lines()
        .map(|line| format!("> {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn describe_check(check: &JsonValue) -> String {
    match check {
        JsonValue::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests;
