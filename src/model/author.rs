use serde::{Deserialize, Serialize};

use super::non_empty;

/// Author information for a feed or an entry. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Author {
    /// Builds an author from display strings; empty strings become absent fields.
    pub fn new(name: impl Into<String>, email: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: non_empty(name),
            email: non_empty(email),
            url: non_empty(url),
        }
    }
}
