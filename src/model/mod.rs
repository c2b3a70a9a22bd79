//! The BEAM content model: feeds, entries and authors.
//!
//! These are plain value types. They serialize to and from the BEAM JSON wire
//! format with `serde`, and carry a structural [`validate`](Feed::validate)
//! that never mutates anything.
//!
//! # Wire format
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "title": "Feed 01",
//!   "feed_url": "http://localhost:8081/feed.json",
//!   "last_updated": "2025-01-02T10:00:00Z",
//!   "items": [
//!     { "id": "a1", "title": "Hello", "url": "https://example.com/a1",
//!       "published": "2025-01-01T10:00:00Z", "_views": 1500 }
//!   ]
//! }
//! ```
//!
//! Optional members that are absent are omitted, never `null`. Item members
//! whose names start with an underscore are extension fields (see
//! [`Extensions`]).

mod author;
mod entry;
mod error;
mod extension;
mod feed;

pub use author::Author;
pub use entry::Entry;
pub use error::{FeedError, ValidationError};
pub use extension::{ExtensionKey, Extensions};
pub use feed::Feed;

/// The only protocol version this implementation reads or writes.
pub const VERSION: &str = "1.0";

/// Content type for served BEAM documents.
pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";

/// Cache directive for served BEAM documents (one hour).
pub const DEFAULT_CACHE_CONTROL: &str = "public, max-age=3600";

/// Decodes a JSON `null` array as an empty one, as nil slices are emitted
/// by some producers.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    let items: Option<Vec<T>> = serde::Deserialize::deserialize(deserializer)?;
    Ok(items.unwrap_or_default())
}

/// Maps an empty display string to `None`, so it is omitted on the wire.
pub(crate) fn non_empty(s: impl Into<String>) -> Option<String> {
    let s = s.into();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
