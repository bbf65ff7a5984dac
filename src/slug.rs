//! Slug derivation and storage-key resolution.
//!
//! A document stored under the flat key `<slug>.md` is addressed
//! publicly by `<slug>`. The mapping is a bijection over well-formed
//! keys: stripping the suffix and re-appending it round-trips exactly.
//! Two distinct stored documents can therefore never share a slug —
//! if a corpus manages that anyway it is an authoring error, not
//! something this module recovers from.

/// Storage suffix for document content.
const CONTENT_SUFFIX: &str = ".md";

/// Derive the public slug from a storage key.
///
/// Returns `None` for keys that are not well-formed documents (wrong
/// suffix, empty stem, path separators).
pub fn from_key(key: &str) -> Option<String> {
    let stem = key.strip_suffix(CONTENT_SUFFIX)?;
    is_well_formed(stem).then(|| stem.to_string())
}

/// Produce the storage lookup key for a slug.
///
/// Returns `None` for malformed slugs so a request-supplied slug can
/// never address anything outside the store root.
pub fn to_key(slug: &str) -> Option<String> {
    is_well_formed(slug).then(|| format!("{slug}{CONTENT_SUFFIX}"))
}

/// A well-formed slug is non-empty and contains no path separators or
/// parent-directory components.
pub fn is_well_formed(slug: &str) -> bool {
    !slug.is_empty() && !slug.contains(['/', '\\']) && slug != "." && slug != ".."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_key() {
        assert_eq!(from_key("hello-world.md"), Some("hello-world".to_string()));
        assert_eq!(from_key("2024-review.md"), Some("2024-review".to_string()));
        assert_eq!(from_key("notes.txt"), None);
        assert_eq!(from_key(".md"), None);
        assert_eq!(from_key("nested/post.md"), None);
    }

    #[test]
    fn test_to_key() {
        assert_eq!(to_key("hello-world"), Some("hello-world.md".to_string()));
        assert_eq!(to_key(""), None);
        assert_eq!(to_key("../../etc/passwd"), None);
        assert_eq!(to_key("a\\b"), None);
        assert_eq!(to_key(".."), None);
    }

    #[test]
    fn test_round_trip() {
        for slug in ["post", "hello-world", "2024-06-01-notes", "a.b"] {
            let key = to_key(slug).unwrap();
            assert_eq!(from_key(&key).as_deref(), Some(slug));
        }
    }
}
