use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{non_empty, Author, Entry, FeedError, ValidationError, VERSION};
use crate::util::is_http_url;

/// A complete BEAM feed: metadata plus an ordered list of entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    pub version: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_page_url: Option<String>,
    pub feed_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub items: Vec<Entry>,
}

impl Feed {
    /// Creates an empty feed at the supported version, stamped with the current time.
    pub fn new(title: impl Into<String>, feed_url: impl Into<String>) -> Self {
        Self {
            version: VERSION.to_string(),
            title: title.into(),
            description: None,
            home_page_url: None,
            feed_url: feed_url.into(),
            language: None,
            author: None,
            last_updated: Some(Utc::now()),
            items: Vec::new(),
        }
    }

    /// Appends an entry and bumps `last_updated` to now.
    pub fn add_entry(&mut self, entry: Entry) {
        self.items.push(entry);
        self.last_updated = Some(Utc::now());
    }

    pub fn set_author(
        &mut self,
        name: impl Into<String>,
        email: impl Into<String>,
        url: impl Into<String>,
    ) {
        self.author = Some(Author::new(name, email, url));
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = non_empty(description);
    }

    pub fn set_home_page_url(&mut self, url: impl Into<String>) {
        self.home_page_url = non_empty(url);
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = non_empty(language);
    }

    /// Checks the feed's structure without modifying it.
    ///
    /// Checks run in order: `version`, `title`, `feed_url`, `home_page_url`,
    /// then each entry in turn. An entry's own error is returned tagged with
    /// its index; an entry whose id was already seen fails with field `items`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.version != VERSION {
            return Err(ValidationError::new(
                "version",
                format!(
                    "unsupported version: {}, expected: {}",
                    self.version, VERSION
                ),
            ));
        }

        if self.title.trim().is_empty() {
            return Err(ValidationError::new("title", "title is required"));
        }

        if !is_http_url(&self.feed_url) {
            return Err(ValidationError::new(
                "feed_url",
                "feed_url must be a valid URL",
            ));
        }

        if let Some(home) = &self.home_page_url {
            if !is_http_url(home) {
                return Err(ValidationError::new(
                    "home_page_url",
                    "home_page_url must be a valid URL",
                ));
            }
        }

        let mut seen_ids = HashSet::with_capacity(self.items.len());
        for (index, entry) in self.items.iter().enumerate() {
            entry.validate().map_err(|e| e.in_entry(index))?;
            if !seen_ids.insert(entry.id.as_str()) {
                return Err(ValidationError::new(
                    "items",
                    format!("duplicate entry ID: {}", entry.id),
                ));
            }
        }

        Ok(())
    }

    /// Serializes to pretty-printed BEAM JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parses BEAM JSON and validates the result.
    ///
    /// # Errors
    ///
    /// - [`FeedError::Parse`] if the bytes are not a well-formed document
    /// - [`FeedError::Validation`] if the document is structurally invalid
    pub fn from_json(bytes: &[u8]) -> Result<Self, FeedError> {
        let feed: Feed = serde_json::from_slice(bytes)?;
        feed.validate()?;
        Ok(feed)
    }

    /// Entries carrying `tag` (case-insensitive).
    pub fn filter_by_tag(&self, tag: &str) -> Vec<&Entry> {
        self.items
            .iter()
            .filter(|e| e.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)))
            .collect()
    }

    /// Entries in `category` (case-insensitive).
    pub fn filter_by_category(&self, category: &str) -> Vec<&Entry> {
        self.items
            .iter()
            .filter(|e| {
                e.category
                    .as_deref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(category))
            })
            .collect()
    }

    /// Entries published within `[start, end]`, both bounds inclusive.
    pub fn filter_by_date_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<&Entry> {
        self.items
            .iter()
            .filter(|e| e.published >= start && e.published <= end)
            .collect()
    }

    /// All distinct tags, in first-seen order.
    pub fn tags(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .flat_map(|e| e.tags.iter().map(String::as_str))
            .filter(|t| seen.insert(*t))
            .collect()
    }

    /// All distinct categories, in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .filter_map(|e| e.category.as_deref())
            .filter(|c| seen.insert(*c))
            .collect()
    }
}
