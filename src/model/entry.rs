use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{non_empty, Author, ExtensionKey, Extensions, ValidationError};
use crate::util::{is_http_url, reading_time_minutes};

/// Seconds from the Unix epoch back to `0001-01-01T00:00:00Z`.
const ZERO_TIME_SECS: i64 = -62_135_596_800;

/// The zero time, `0001-01-01T00:00:00Z`, which other BEAM producers emit for
/// an unset `published`.
///
/// A document that omits `published` decodes with this value too, so
/// validation rather than the JSON decoder reports the missing field.
pub(crate) fn unset_timestamp() -> DateTime<Utc> {
    DateTime::from_timestamp(ZERO_TIME_SECS, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// A single content item within a feed.
///
/// Timestamps are stored in UTC. `reading_time` is derived from `content` by
/// [`Entry::set_content`]; decoded documents keep whatever value they carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub url: String,
    #[serde(default = "unset_timestamp")]
    pub published: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(
        default,
        deserialize_with = "super::null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<u32>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl Entry {
    /// Creates an entry with the required fields; `published` is normalised to UTC.
    pub fn new<Tz: TimeZone>(
        id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        published: DateTime<Tz>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: None,
            summary: None,
            url: url.into(),
            published: published.with_timezone(&Utc),
            updated: None,
            author: None,
            tags: Vec::new(),
            category: None,
            image: None,
            reading_time: None,
            extensions: Extensions::default(),
        }
    }

    pub fn set_author(
        &mut self,
        name: impl Into<String>,
        email: impl Into<String>,
        url: impl Into<String>,
    ) {
        self.author = Some(Author::new(name, email, url));
    }

    /// Sets the HTML content and recomputes the reading-time estimate.
    pub fn set_content(&mut self, content: impl Into<String>) {
        let content = content.into();
        self.reading_time = reading_time_minutes(&content);
        self.content = non_empty(content);
    }

    pub fn set_summary(&mut self, summary: impl Into<String>) {
        self.summary = non_empty(summary);
    }

    pub fn set_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = non_empty(category);
    }

    pub fn set_image(&mut self, image_url: impl Into<String>) {
        self.image = non_empty(image_url);
    }

    pub fn set_updated<Tz: TimeZone>(&mut self, updated: DateTime<Tz>) {
        self.updated = Some(updated.with_timezone(&Utc));
    }

    pub fn set_extension(&mut self, key: ExtensionKey, value: impl Into<Value>) {
        self.extensions.insert(key, value);
    }

    pub fn extension(&self, key: &ExtensionKey) -> Option<&Value> {
        self.extensions.get(key)
    }

    /// Checks the entry's structure without modifying it.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first failing field, checked
    /// in this order: `id`, `title`, `url`, `published`, `image`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::new("id", "id is required"));
        }

        if self.title.trim().is_empty() {
            return Err(ValidationError::new("title", "title is required"));
        }

        if !is_http_url(&self.url) {
            return Err(ValidationError::new("url", "url must be a valid URL"));
        }

        if self.published == unset_timestamp() {
            return Err(ValidationError::new(
                "published",
                "published timestamp is required",
            ));
        }

        if let Some(image) = &self.image {
            if !is_http_url(image) {
                return Err(ValidationError::new("image", "image must be a valid URL"));
            }
        }

        Ok(())
    }
}
