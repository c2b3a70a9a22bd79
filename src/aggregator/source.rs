use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of the most recent fetch attempt for a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    /// Registered, not fetched yet.
    New,
    /// Last fetch succeeded.
    Active,
    /// Last fetch failed; see `error_msg`.
    Error,
    /// Part of the wire vocabulary. The engine records timeouts as `Error`
    /// with the timeout in the message.
    Timeout,
}

impl SourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceStatus::New => "new",
            SourceStatus::Active => "active",
            SourceStatus::Error => "error",
            SourceStatus::Timeout => "timeout",
        }
    }
}

/// A remote feed polled by the aggregator.
///
/// Only the aggregation engine writes `last_fetch`, `status` and `error_msg`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub url: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_fetch: Option<DateTime<Utc>>,
    pub status: SourceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_msg: Option<String>,
}

impl FeedSource {
    pub fn new(
        url: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            description: description.into(),
            last_fetch: None,
            status: SourceStatus::New,
            error_msg: None,
        }
    }

    pub(crate) fn record_success(&mut self, at: DateTime<Utc>) {
        self.last_fetch = Some(at);
        self.status = SourceStatus::Active;
        self.error_msg = None;
    }

    pub(crate) fn record_failure(&mut self, at: DateTime<Utc>, message: String) {
        self.last_fetch = Some(at);
        self.status = SourceStatus::Error;
        self.error_msg = Some(message);
    }
}
