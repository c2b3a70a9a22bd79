//! Content fingerprints for detecting tampered or corrupted feeds.
//!
//! The fingerprint is a SHA-256 digest over the compact JSON serialization of
//! an entry sequence, hex encoded. It covers exactly those bytes: reordering
//! entries changes it just like editing one does.

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::model::{Entry, Feed};

#[derive(Debug, Error)]
pub enum IntegrityError {
    /// The entries could not be serialized for hashing.
    #[error("failed to serialize entries for hashing: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The recomputed fingerprint differs from the trusted one.
    #[error("feed hash mismatch: data may not be trustworthy (expected {expected}, got {actual})")]
    Mismatch { expected: String, actual: String },
}

/// Computes the hex-encoded SHA-256 fingerprint of `entries`.
///
/// # Errors
///
/// Returns [`IntegrityError::Serialization`] if an entry cannot be serialized.
pub fn compute_content_hash(entries: &[Entry]) -> Result<String, IntegrityError> {
    let bytes = serde_json::to_vec(entries)?;
    let hash = Sha256::digest(&bytes);
    Ok(format!("{:x}", hash))
}

/// Recomputes the fingerprint of `entries` and compares it with `expected`.
///
/// # Errors
///
/// Returns [`IntegrityError::Mismatch`] when the fingerprints differ.
pub fn validate_content_hash(entries: &[Entry], expected: &str) -> Result<(), IntegrityError> {
    let actual = compute_content_hash(entries)?;
    if actual != expected {
        return Err(IntegrityError::Mismatch {
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

impl Feed {
    /// Fingerprint of this feed's entries. See [`compute_content_hash`].
    pub fn content_hash(&self) -> Result<String, IntegrityError> {
        compute_content_hash(&self.items)
    }

    /// Verifies this feed's entries against a trusted fingerprint.
    pub fn validate_content_hash(&self, expected: &str) -> Result<(), IntegrityError> {
        validate_content_hash(&self.items, expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn entry(id: &str, day: u32) -> Entry {
        Entry::new(
            id,
            format!("Title {id}"),
            format!("https://example.com/{id}"),
            Utc.with_ymd_and_hms(2025, 1, day, 10, 0, 0).unwrap(),
        )
    }

    fn entries() -> Vec<Entry> {
        vec![entry("a", 1), entry("b", 2), entry("c", 3)]
    }

    #[test]
    fn test_hash_is_hex_sha256() {
        let hash = compute_content_hash(&entries()).unwrap();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(
            compute_content_hash(&entries()).unwrap(),
            compute_content_hash(&entries()).unwrap()
        );
    }

    #[test]
    fn test_empty_sequence_hash() {
        // SHA-256 of "[]"
        assert_eq!(
            compute_content_hash(&[]).unwrap(),
            "4f53cda18c2baa0c0354bb5f9a3ecbe5ed12ab4d8e11ba873c2f11161202b945"
        );
    }

    #[test]
    fn test_reordering_changes_hash() {
        let original = entries();
        let mut reordered = original.clone();
        reordered.swap(0, 2);
        assert_ne!(
            compute_content_hash(&original).unwrap(),
            compute_content_hash(&reordered).unwrap()
        );
    }

    #[test]
    fn test_added_and_removed_entries_change_hash() {
        let original = entries();
        let hash = compute_content_hash(&original).unwrap();

        let mut added = original.clone();
        added.push(entry("d", 4));
        assert!(validate_content_hash(&added, &hash).is_err());

        let removed = &original[..2];
        assert!(validate_content_hash(removed, &hash).is_err());
    }

    #[test]
    fn test_validate_accepts_matching_hash() {
        let feed_entries = entries();
        let hash = compute_content_hash(&feed_entries).unwrap();
        assert!(validate_content_hash(&feed_entries, &hash).is_ok());
    }

    #[test]
    fn test_feed_methods_cover_items() {
        let mut feed = Feed::new("Feed", "https://example.com/feed.json");
        for e in entries() {
            feed.add_entry(e);
        }
        let hash = feed.content_hash().unwrap();
        assert_eq!(hash, compute_content_hash(&feed.items).unwrap());

        // Metadata is outside the fingerprint.
        feed.set_description("changed");
        assert!(feed.validate_content_hash(&hash).is_ok());

        feed.items[0].set_summary("edited");
        match feed.validate_content_hash(&hash) {
            Err(IntegrityError::Mismatch { expected, actual }) => {
                assert_eq!(expected, hash);
                assert_ne!(actual, hash);
            }
            other => panic!("Expected Mismatch, got {:?}", other),
        }
    }

    fn edit_field(entry: &mut Entry, field: u8, text: &str) {
        match field % 6 {
            0 => entry.title = format!("{} {text}", entry.title),
            1 => entry.set_summary(format!("summary {text}")),
            2 => entry.set_content(format!("<p>{text}</p>")),
            3 => entry.tags.push(text.to_string()),
            4 => entry.set_category(format!("category {text}")),
            _ => entry.url.push_str("/edited"),
        }
    }

    proptest! {
        #[test]
        fn prop_any_field_edit_breaks_hash(
            index in 0usize..3,
            field in any::<u8>(),
            text in "[a-z]{1,12}",
        ) {
            let original = entries();
            let hash = compute_content_hash(&original).unwrap();

            let mut edited = original.clone();
            edit_field(&mut edited[index], field, &text);

            prop_assert!(matches!(
                validate_content_hash(&edited, &hash),
                Err(IntegrityError::Mismatch { .. })
            ), "expected IntegrityError::Mismatch");
        }

        #[test]
        fn prop_rotation_changes_hash(shift in 1usize..3) {
            let original = entries();
            let mut rotated = original.clone();
            rotated.rotate_left(shift);
            prop_assert_ne!(
                compute_content_hash(&original).unwrap(),
                compute_content_hash(&rotated).unwrap()
            );
        }
    }
}
