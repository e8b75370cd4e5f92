//! Markdown document request and response models.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::{Error, Result};

/// Markdown formatting style.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MarkdownStyle {
    #[default]
    Standard,
    Github,
    Minimal,
}

impl MarkdownStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkdownStyle::Standard => "standard",
            MarkdownStyle::Github => "github",
            MarkdownStyle::Minimal => "minimal",
        }
    }
}

/// Heading level, always within 1..=6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    pub fn get(self) -> u8 {
        self.0
    }

    /// The `#` prefix for this level.
    pub fn marker(self) -> String {
        "#".repeat(usize::from(self.0))
    }
}

impl Default for HeadingLevel {
    fn default() -> Self {
        Self(2)
    }
}

impl TryFrom<i64> for HeadingLevel {
    type Error = Error;

    fn try_from(level: i64) -> Result<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&level) {
            Ok(Self(level as u8))
        } else {
            Err(Error::Validation(format!(
                "section level must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                level
            )))
        }
    }
}

// ============================================================================
// Request Types
// ============================================================================

/// Body of `POST /markdown-generator/generate`.
///
/// Required fields are optional here so that missing values produce a
/// validation message instead of a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default = "default_include_metadata")]
    pub include_metadata: bool,
    #[serde(default)]
    pub markdown_style: MarkdownStyle,
    #[serde(default)]
    pub sections: Vec<SectionInput>,
}

fn default_include_metadata() -> bool {
    true
}

/// A section as submitted by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionInput {
    pub heading: String,
    pub content: String,
    #[serde(default = "default_section_level")]
    pub level: i64,
}

fn default_section_level() -> i64 {
    i64::from(HeadingLevel::default().get())
}

/// A validated document section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub content: String,
    pub level: HeadingLevel,
}

/// A validated generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSpec {
    pub title: String,
    pub content: String,
    pub filename: Option<String>,
    pub include_metadata: bool,
    pub style: MarkdownStyle,
    pub sections: Vec<Section>,
}

impl GenerateRequest {
    /// Check required fields and section levels.
    pub fn validate(self) -> Result<DocumentSpec> {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Error::Validation("title is required".into()))?;

        let content = self
            .content
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Error::Validation("content is required".into()))?;

        let sections = self
            .sections
            .into_iter()
            .enumerate()
            .map(|(i, section)| {
                let level = HeadingLevel::try_from(section.level).map_err(|e| match e {
                    Error::Validation(msg) => Error::Validation(format!("sections[{}]: {}", i, msg)),
                    other => other,
                })?;
                Ok(Section {
                    heading: section.heading,
                    content: section.content,
                    level,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(DocumentSpec {
            title,
            content,
            filename: self.filename.filter(|f| !f.trim().is_empty()),
            include_metadata: self.include_metadata,
            style: self.markdown_style,
            sections,
        })
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Descriptor of a generated file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub download_url: String,
    pub filename: String,
    pub file_size: u64,
    pub word_count: usize,
    #[serde(serialize_with = "serialize_iso_millis")]
    pub expires_at: DateTime<Utc>,
}

/// ISO 8601 with millisecond precision and a `Z` suffix.
pub fn iso_millis(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_iso_millis<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&iso_millis(ts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    fn parse(body: serde_json::Value) -> GenerateRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let spec = parse(json!({ "title": "T", "content": "C" })).validate().unwrap();
        assert!(spec.include_metadata);
        assert_eq!(spec.style, MarkdownStyle::Standard);
        assert!(spec.sections.is_empty());
        assert_eq!(spec.filename, None);
    }

    #[test]
    fn test_missing_required_fields() {
        let err = parse(json!({ "title": "T" })).validate().unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m.contains("content")));

        let err = parse(json!({ "content": "C" })).validate().unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m.contains("title")));

        let err = parse(json!({ "title": "   ", "content": "C" })).validate().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_section_levels() {
        let spec = parse(json!({
            "title": "T",
            "content": "C",
            "sections": [
                { "heading": "A", "content": "a" },
                { "heading": "B", "content": "b", "level": 6 }
            ]
        }))
        .validate()
        .unwrap();
        assert_eq!(spec.sections[0].level.get(), 2);
        assert_eq!(spec.sections[1].level.marker(), "######");
    }

    #[rstest]
    #[case(0)]
    #[case(7)]
    #[case(-1)]
    fn test_out_of_range_level_is_rejected(#[case] level: i64) {
        let err = parse(json!({
            "title": "T",
            "content": "C",
            "sections": [{ "heading": "A", "content": "a", "level": level }]
        }))
        .validate()
        .unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m.starts_with("sections[0]")));
    }

    #[test]
    fn test_unknown_style_is_rejected() {
        let result: std::result::Result<GenerateRequest, _> =
            serde_json::from_value(json!({ "title": "T", "content": "C", "markdownStyle": "fancy" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_filename_is_ignored() {
        let spec = parse(json!({ "title": "T", "content": "C", "filename": "  " }))
            .validate()
            .unwrap();
        assert_eq!(spec.filename, None);
    }

    #[test]
    fn test_response_serialization() {
        let response = GenerateResponse {
            download_url: "http://localhost/downloads/abc".into(),
            filename: "notes-1.md".into(),
            file_size: 12,
            word_count: 2,
            expires_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["downloadUrl"], "http://localhost/downloads/abc");
        assert_eq!(value["fileSize"], 12);
        assert_eq!(value["wordCount"], 2);
        assert_eq!(value["expiresAt"], "2024-05-01T12:00:00.000Z");
    }
}
