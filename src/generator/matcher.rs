//! Keyword dispatch from a brief to a page template.

/// Page template selected for a brief.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    /// Captcha loading and solving page.
    Captcha,
    /// CSV-driven sales summary.
    SalesSummary,
    /// Markdown rendering page.
    MarkdownViewer,
    /// GitHub account lookup form.
    GitHubLookup,
    /// Brief and attachment preview.
    Generic,
}

impl TemplateKind {
    /// Returns the template name used to render `index.html`.
    #[must_use]
    pub const fn template_name(self) -> &'static str {
        match self {
            Self::Captcha => "captcha.html",
            Self::SalesSummary => "sales.html",
            Self::MarkdownViewer => "markdown.html",
            Self::GitHubLookup => "github.html",
            Self::Generic => "generic.html",
        }
    }
}

/// Maps any of a set of keywords to a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateMatcher {
    kind: TemplateKind,
    keywords: &'static [&'static str],
}

impl TemplateMatcher {
    /// Creates a matcher.
    #[must_use]
    pub const fn new(kind: TemplateKind, keywords: &'static [&'static str]) -> Self {
        Self { kind, keywords }
    }

    /// Returns the template this matcher selects.
    #[must_use]
    pub const fn kind(&self) -> TemplateKind {
        self.kind
    }

    /// Returns `true` when the lower-cased brief contains any keyword.
    #[must_use]
    pub fn matches(&self, lowered_brief: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| lowered_brief.contains(keyword))
    }
}

/// Matchers in priority order. The first match wins.
pub const DEFAULT_MATCHERS: [TemplateMatcher; 4] = [
    TemplateMatcher::new(TemplateKind::Captcha, &["captcha"]),
    TemplateMatcher::new(TemplateKind::SalesSummary, &["sales", "csv"]),
    TemplateMatcher::new(TemplateKind::MarkdownViewer, &["markdown"]),
    TemplateMatcher::new(TemplateKind::GitHubLookup, &["github"]),
];

/// Selects the template for a brief, falling back to [`TemplateKind::Generic`].
#[must_use]
pub fn select_template(brief: &str) -> TemplateKind {
    let lowered = brief.to_lowercase();
    DEFAULT_MATCHERS
        .iter()
        .find(|matcher| matcher.matches(&lowered))
        .map_or(TemplateKind::Generic, TemplateMatcher::kind)
}

#[cfg(test)]
mod tests {
    use super::{TemplateKind, select_template};
    use rstest::rstest;

    #[rstest]
    #[case("Build a captcha solver", TemplateKind::Captcha)]
    #[case("Summarise SALES from the attached file", TemplateKind::SalesSummary)]
    #[case("Parse data.csv and show totals", TemplateKind::SalesSummary)]
    #[case("Render the Markdown attachment", TemplateKind::MarkdownViewer)]
    #[case("Look up a GitHub user", TemplateKind::GitHubLookup)]
    #[case("Show a greeting", TemplateKind::Generic)]
    #[case("", TemplateKind::Generic)]
    fn selects_template_by_keyword(#[case] brief: &str, #[case] expected: TemplateKind) {
        assert_eq!(select_template(brief), expected);
    }

    #[rstest]
    #[case("captcha for github sales", TemplateKind::Captcha)]
    #[case("markdown report of csv sales", TemplateKind::SalesSummary)]
    #[case("github markdown viewer", TemplateKind::MarkdownViewer)]
    fn earlier_matchers_take_priority(#[case] brief: &str, #[case] expected: TemplateKind) {
        assert_eq!(select_template(brief), expected);
    }
}
