//! Filename slugs for generated artifacts.
//!
//! Display names are only ever used for `Content-Disposition`; storage
//! addressing goes through the artifact id.

/// Fallback base name when a title slugs to nothing.
pub const DEFAULT_BASE_NAME: &str = "document";

/// Extension appended to every display name.
pub const MARKDOWN_EXTENSION: &str = "md";

/// Generate a slug from a title.
///
/// Lowercases the input, replaces every run of characters outside
/// `[a-z0-9]` with a single hyphen, and trims leading/trailing hyphens.
///
/// # Example
/// ```
/// use mdgen_storage::slug::slugify;
/// assert_eq!(slugify("My Report!"), "my-report");
/// assert_eq!(slugify("  Q3 -- Results  "), "q3-results");
/// ```
pub fn slugify(title: &str) -> String {
    let mut result = String::with_capacity(title.len());
    let mut prev_hyphen = true; // Start true to skip leading hyphens

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            result.push(c);
            prev_hyphen = false;
        } else if !prev_hyphen {
            result.push('-');
            prev_hyphen = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

/// Slug a title, falling back to [`DEFAULT_BASE_NAME`] when nothing is left.
pub fn slugify_or_default(title: &str) -> String {
    let slug = slugify(title);
    if slug.is_empty() {
        DEFAULT_BASE_NAME.to_string()
    } else {
        slug
    }
}

/// Build a unique markdown filename from a title and a millisecond timestamp.
///
/// # Example
/// ```
/// use mdgen_storage::slug::timestamped_filename;
/// assert_eq!(
///     timestamped_filename("My Report!", 1700000000000),
///     "my-report-1700000000000.md"
/// );
/// ```
pub fn timestamped_filename(title: &str, timestamp_millis: i64) -> String {
    format!(
        "{}-{}.{}",
        slugify_or_default(title),
        timestamp_millis,
        MARKDOWN_EXTENSION
    )
}

/// Sanitize an arbitrary caller-supplied name into a safe display filename.
///
/// A trailing `.md` (any case) is treated as the extension and kept; the
/// rest is slugged. `None` or a name that slugs to nothing yields
/// `document.md`.
pub fn display_name(suggested: Option<&str>) -> String {
    let stem = suggested
        .map(|name| {
            let trimmed = name.trim();
            let lower = trimmed.to_ascii_lowercase();
            if lower.ends_with(".md") {
                &trimmed[..trimmed.len() - 3]
            } else {
                trimmed
            }
        })
        .unwrap_or_default();

    format!("{}.{}", slugify_or_default(stem), MARKDOWN_EXTENSION)
}
