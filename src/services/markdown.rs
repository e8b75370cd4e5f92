//! Markdown assembly.
//!
//! Builds the document text from a validated [`DocumentSpec`]:
//!
//! ```markdown
//! ---
//! title: Quarterly Report
//! created: 2024-05-01T12:00:00.000Z
//! generated_by: Markdown Generator
//! ---
//!
//! # Quarterly Report
//!
//! Body text...
//!
//! ## Section heading
//!
//! Section text...
//! ```

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{iso_millis, DocumentSpec, MarkdownStyle};

static BLANK_LINE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("blank line pattern is valid"));

/// Renders documents to markdown text.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    tool_name: String,
}

impl MarkdownRenderer {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
        }
    }

    /// Assemble the full document, stamping front matter with `now`.
    pub fn render(&self, doc: &DocumentSpec, now: DateTime<Utc>) -> String {
        let mut markdown = String::new();

        if doc.include_metadata {
            markdown.push_str("---\n");
            markdown.push_str(&format!("title: {}\n", doc.title));
            markdown.push_str(&format!("created: {}\n", iso_millis(&now)));
            markdown.push_str(&format!("generated_by: {}\n", self.tool_name));
            markdown.push_str("---\n\n");
        }

        markdown.push_str(&format!("# {}\n\n", doc.title));
        markdown.push_str(&doc.content);
        markdown.push_str("\n\n");

        for section in &doc.sections {
            markdown.push_str(&format!("{} {}\n\n", section.level.marker(), section.heading));
            markdown.push_str(&section.content);
            markdown.push_str("\n\n");
        }

        self.apply_style(markdown, doc.style)
    }

    /// Style post-processing on an assembled document.
    pub fn apply_style(&self, mut markdown: String, style: MarkdownStyle) -> String {
        match style {
            MarkdownStyle::Standard => markdown,
            MarkdownStyle::Github => {
                markdown.push_str(&format!("---\n\n*Generated with {}*\n", self.tool_name));
                markdown
            }
            MarkdownStyle::Minimal => collapse_blank_lines(&markdown),
        }
    }
}

/// Collapse every run of three or more newlines to exactly two.
pub fn collapse_blank_lines(text: &str) -> String {
    BLANK_LINE_RUNS.replace_all(text, "\n\n").into_owned()
}
