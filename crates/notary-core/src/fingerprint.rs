//! Content fingerprinting.
//!
//! A fingerprint is the SHA-256 of normalized document content, rendered as
//! 64 lowercase hex characters. Records issued before full-content capture
//! were hashed from a composite of their identity fields, and the earliest
//! ones from a canonical JSON form; both legacy paths are kept
//! byte-compatible so historical records stay verifiable.

use sha2::{Digest, Sha256};

use crate::normalize::normalize;

fn digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Fingerprint of the full document content.
pub fn content_fingerprint(content: &str) -> String {
    digest(&normalize(content))
}

/// Issuance-time fingerprint. Falls back to the legacy identity-field
/// composite when no content was captured: the normalized title and
/// category joined by `|`, re-normalized (the separator drops out), then
/// digested.
pub fn document_fingerprint(content: &str, title: &str, category: &str) -> String {
    if content.is_empty() {
        let composite = format!("{}|{}", normalize(title), normalize(category));
        digest(&normalize(&composite))
    } else {
        content_fingerprint(content)
    }
}

/// Oldest hashing scheme: normalize every field value, serialize the map in
/// the historical canonical form, digest the serialized text.
pub fn legacy_fingerprint(fields: &[(&str, &str)]) -> String {
    digest(&canonical_form(fields))
}

/// The historical canonical serialization: a JSON object with keys sorted,
/// `", "` between pairs and `": "` after keys. Values are normalize()
/// output, so no JSON escaping can ever be required.
fn canonical_form(fields: &[(&str, &str)]) -> String {
    let mut pairs: Vec<(&str, String)> = fields
        .iter()
        .map(|(key, value)| (*key, normalize(value)))
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    let body = pairs
        .iter()
        .map(|(key, value)| format!("\"{key}\": \"{value}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{body}}}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_64_lowercase_hex() {
        for content in ["", "hello world", "Certificate of Completion — Alice"] {
            let fp = content_fingerprint(content);
            assert_eq!(fp.len(), 64);
            assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn equal_normalized_content_hashes_equal() {
        assert_eq!(
            content_fingerprint("  Hello,   WORLD! "),
            content_fingerprint("hello world")
        );
        assert_ne!(content_fingerprint("hello world"), content_fingerprint("hello worlds"));
    }

    #[test]
    fn known_vectors() {
        // sha256("hello world")
        assert_eq!(
            content_fingerprint("Hello,  World!"),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
        assert_eq!(
            content_fingerprint("Certificate of Completion — Alice"),
            "9b506f0318f13ba0f51b6e9ea60150d90415ad3b66b556f9c318c0eec55c0719"
        );
        // sha256("") for empty content with empty identity fields
        assert_eq!(
            document_fingerprint("", "", ""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn empty_content_falls_back_to_identity_composite() {
        // sha256("alice johnsongeneral document"): the `|` separator is
        // stripped by the re-normalization pass.
        let fp = document_fingerprint("", "Alice Johnson", "General Document");
        assert_eq!(fp, "d3eb20084105a831b234186c8f0cdf56b5d9ab2e12c828221b9a97401c7ef9b0");

        let with_content = document_fingerprint("some content", "Alice Johnson", "General Document");
        assert_eq!(with_content, content_fingerprint("some content"));
    }

    #[test]
    fn legacy_canonical_form_is_key_sorted_with_historical_separators() {
        let fields = [("subject", "Alice Johnson"), ("category", "General Document")];
        assert_eq!(
            canonical_form(&fields),
            r#"{"category": "general document", "subject": "alice johnson"}"#
        );
        assert_eq!(
            legacy_fingerprint(&fields),
            "edba5baee2d7510f319a9df5f95e4b1bbdf1bc95a8edec30765e12ca7c946e57"
        );
    }

    #[test]
    fn legacy_fingerprint_ignores_field_order() {
        let a = legacy_fingerprint(&[("subject", "X"), ("category", "Y")]);
        let b = legacy_fingerprint(&[("category", "Y"), ("subject", "X")]);
        assert_eq!(a, b);
    }
}
