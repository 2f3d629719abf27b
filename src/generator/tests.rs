//! Rendering tests for the template content generator.

use super::{TemplateContentGenerator, escape_js_template_literal};
use crate::provisioning::{
    domain::{Attachment, DecodedAttachment, GeneratedFileSet, ProjectIdentifier},
    ports::{ContentGenerator, GenerationInput},
};
use chrono::{DateTime, TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn generator() -> TemplateContentGenerator {
    TemplateContentGenerator::new("Ada Lovelace")
}

#[fixture]
fn project() -> ProjectIdentifier {
    ProjectIdentifier::derive("sum-of-sales", 1_700_000_000_000)
}

fn issued_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2031, 3, 14, 9, 26, 53)
        .single()
        .expect("valid timestamp")
}

fn generate(
    generator: &TemplateContentGenerator,
    project: &ProjectIdentifier,
    brief: &str,
    attachments: &[DecodedAttachment],
    checks: &[Value],
) -> GeneratedFileSet {
    let input = GenerationInput {
        project,
        brief,
        attachments,
        checks,
        issued_at: issued_at(),
    };
    generator.generate(&input).expect("generation should succeed")
}

fn index(files: &GeneratedFileSet) -> &str {
    files.get("index.html").expect("index.html should be generated")
}

#[rstest]
fn emits_files_in_publication_order(
    generator: TemplateContentGenerator,
    project: ProjectIdentifier,
) {
    let files = generate(&generator, &project, "Show a greeting", &[], &[]);

    assert_eq!(files.paths(), vec!["index.html", "README.md", "LICENSE"]);
}

#[rstest]
fn sales_page_embeds_csv_and_precomputes_total(
    generator: TemplateContentGenerator,
    project: ProjectIdentifier,
) {
    let csv = "Product,Sales\nWidget,100\nGadget,50";
    let attachments = [DecodedAttachment::new("data.csv", "text/csv", csv)];

    let files = generate(
        &generator,
        &project,
        "Summarize sales",
        &attachments,
        &[],
    );
    let page = index(&files);

    assert!(page.contains("<title>Sales Summary</title>"));
    assert!(page.contains(&format!("const csvData = `{csv}`;")));
    assert!(page.contains(r#"<span id="total-amount">150.00</span>"#));
}

#[rstest]
fn sales_page_uses_last_csv_attachment(
    generator: TemplateContentGenerator,
    project: ProjectIdentifier,
) {
    let attachments = [
        DecodedAttachment::new("old.csv", "text/csv", "Product,Sales\nA,1"),
        DecodedAttachment::new("notes.txt", "text/plain", "ignore me"),
        DecodedAttachment::new("new.csv", "text/csv", "Product,Sales\nB,2.5"),
    ];

    let files = generate(&generator, &project, "csv report", &attachments, &[]);
    let page = index(&files);

    assert!(page.contains("B,2.5"));
    assert!(!page.contains("A,1"));
    assert!(page.contains(r#"<span id="total-amount">2.50</span>"#));
}

#[rstest]
fn markdown_page_escapes_template_literal_syntax(
    generator: TemplateContentGenerator,
    project: ProjectIdentifier,
) {
    let markdown = "# Title\n\n`code` costs ${price} \\o/";
    let attachments = [DecodedAttachment::new(
        "input.md",
        "text/markdown",
        markdown,
    )];

    let files = generate(
        &generator,
        &project,
        "Render markdown",
        &attachments,
        &[],
    );
    let page = index(&files);

    assert!(page.contains(r"const markdownContent = `# Title

\`code\` costs \${price} \\o/`;"));
}

#[rstest]
fn github_page_seed_is_stable_per_project(generator: TemplateContentGenerator) {
    let first = ProjectIdentifier::derive("lookup", 1);
    let second = ProjectIdentifier::derive("lookup", 2);

    let once = generate(&generator, &first, "GitHub user lookup", &[], &[]);
    let twice = generate(&generator, &first, "GitHub user lookup", &[], &[]);
    let other = generate(&generator, &second, "GitHub user lookup", &[], &[]);

    let seed = index(&once)
        .split(r#"<form id="github-user-"#)
        .nth(1)
        .and_then(|rest| rest.split('"').next())
        .expect("form id should be rendered");
    assert_eq!(seed.len(), 10, "seed {seed}");
    assert!(seed.chars().all(|ch| matches!(ch, '0'..='9' | 'a'..='f')), "seed {seed}");
    assert_eq!(index(&once), index(&twice));
    assert_ne!(index(&once), index(&other));
}

#[rstest]
fn captcha_page_is_selected_first(
    generator: TemplateContentGenerator,
    project: ProjectIdentifier,
) {
    let files = generate(
        &generator,
        &project,
        "Captcha solver for sales on GitHub",
        &[],
        &[],
    );

    assert!(index(&files).contains("<title>Captcha Solver</title>"));
}

#[rstest]
fn generic_page_escapes_brief_and_truncates_previews(
    generator: TemplateContentGenerator,
    project: ProjectIdentifier,
) {
    let long = "x".repeat(600);
    let attachments = [
        DecodedAttachment::new("long.txt", "text/plain", long.as_str()),
        DecodedAttachment::new("short.txt", "text/plain", "hello"),
    ];

    let files = generate(
        &generator,
        &project,
        "Say <b>hi & bye",
        &attachments,
        &[],
    );
    let page = index(&files);

    assert!(page.contains("<p>Say &lt;b&gt;hi &amp; bye</p>"));
    assert!(page.contains(&format!("<code>{}...</code>", "x".repeat(500))));
    assert!(page.contains("<code>hello</code>"));
    assert!(page.contains("<strong>long.txt</strong>"));
}

#[rstest]
fn generic_page_shows_placeholder_attachments(
    generator: TemplateContentGenerator,
    project: ProjectIdentifier,
) {
    let attachment = DecodedAttachment::from_attachment(&Attachment::new("remote.png", ""));

    let files = generate(&generator, &project, "Show it", &[attachment], &[]);

    assert!(index(&files).contains("<strong>remote.png</strong>"));
}

#[rstest]
fn readme_quotes_brief_and_lists_checks(
    generator: TemplateContentGenerator,
    project: ProjectIdentifier,
) {
    let checks = [json!("Page has a title"), json!({"js": "document.title"})];

    let files = generate(
        &generator,
        &project,
        "First line\nSecond line",
        &[],
        &checks,
    );
    let readme = files.get("README.md").expect("README.md should be generated");

    assert!(readme.starts_with("# Generated Application"));
    assert!(readme.contains("> First line\n> Second line"));
    assert!(readme.contains("## Checks\n- Page has a title\n- {\"js\":\"document.title\"}\n"));
}

#[rstest]
fn readme_omits_checks_section_without_checks(
    generator: TemplateContentGenerator,
    project: ProjectIdentifier,
) {
    let files = generate(&generator, &project, "Anything", &[], &[]);
    let readme = files.get("README.md").expect("README.md should be generated");

    assert!(!readme.contains("## Checks"));
    assert!(readme.contains("easy deployment\n\n## Code Structure"));
}

#[rstest]
fn license_uses_issue_year_and_holder(
    generator: TemplateContentGenerator,
    project: ProjectIdentifier,
) {
    let files = generate(&generator, &project, "Anything", &[], &[]);
    let license = files.get("LICENSE").expect("LICENSE should be generated");

    assert!(license.starts_with("MIT License"));
    assert!(license.contains("Copyright (c) 2031 Ada Lovelace"));
}

#[rstest]
#[case("plain text", "plain text")]
#[case(r"C:\path", r"C:\\path")]
#[case("a `tick`", r"a \`tick\`")]
#[case("${x} and $y", r"\${x} and $y")]
fn escapes_js_template_literals(#[case] raw: &str, #[case] expected: &str) {
    assert_eq!(escape_js_template_literal(raw), expected);
}
