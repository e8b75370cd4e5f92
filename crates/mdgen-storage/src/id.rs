//! Artifact identifiers.
//!
//! Ids are UUID v4 values in simple (hyphen-free, lowercase hex) form, so a
//! well-formed id can never contain a path separator or a `..` segment.

use uuid::Uuid;

/// Length of an id in its simple hex form.
pub const ID_LEN: usize = 32;

/// Generate a fresh random artifact id.
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Check that an untrusted string is a well-formed artifact id.
pub fn is_valid_id(id: &str) -> bool {
    id.len() == ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_valid_and_distinct() {
        let a = generate_id();
        let b = generate_id();
        assert!(is_valid_id(&a), "{a}");
        assert!(is_valid_id(&b), "{b}");
        assert_ne!(a, b);
    }

    #[test]
    fn test_rejects_malformed_ids() {
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("../../etc/passwd"));
        assert!(!is_valid_id("0123456789abcdef0123456789abcde/"));
        assert!(!is_valid_id("0123456789ABCDEF0123456789ABCDEF"));
        assert!(!is_valid_id("0123456789abcdef0123456789abcdef0"));
        assert!(!is_valid_id("01234567-89ab-cdef-0123-456789abcdef"));
        assert!(is_valid_id("0123456789abcdef0123456789abcdef"));
    }
}
