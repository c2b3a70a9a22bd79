use std::fmt;

use thiserror::Error;

/// A structural problem with a feed or an entry.
///
/// `field` names the offending wire field (`"version"`, `"feed_url"`,
/// `"items"`, `"url"`, ...). When the problem sits inside an entry of a feed,
/// `entry` carries that entry's index and the field is the entry's own field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub entry: Option<usize>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            entry: None,
        }
    }

    /// Tags this error with the index of the entry that produced it.
    pub fn in_entry(mut self, index: usize) -> Self {
        self.entry = Some(index);
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(index) = self.entry {
            write!(f, "entry {index}: ")?;
        }
        write!(
            f,
            "validation error in field '{}': {}",
            self.field, self.message
        )
    }
}

impl std::error::Error for ValidationError {}

/// Errors from turning bytes into a validated [`Feed`](super::Feed).
#[derive(Debug, Error)]
pub enum FeedError {
    /// The document is not well-formed BEAM JSON.
    #[error("failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// The document parsed but is structurally invalid.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
}
