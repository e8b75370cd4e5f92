//! Text metrics recorded with each artifact.

/// Count the words in a document.
///
/// A word is a whitespace-delimited token containing at least one
/// alphanumeric character, so markdown markup such as `#`, `---` or `*`
/// on its own is not counted.
///
/// # Example
/// ```
/// use mdgen_storage::text::count_words;
/// assert_eq!(count_words("# Hello World\n\nSome body text.\n\n"), 5);
/// ```
pub fn count_words(text: &str) -> usize {
    text.split_whitespace()
        .filter(|token| token.chars().any(char::is_alphanumeric))
        .count()
}
