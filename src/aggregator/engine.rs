use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{mpsc, RwLock};

use super::source::{FeedSource, SourceStatus};
use crate::feed::{FetchError, Fetcher};
use crate::model::{Entry, Feed};

/// Most entries kept in a published feed.
pub const MAX_ENTRIES: usize = 100;

const AGGREGATED_LANGUAGE: &str = "en-US";

#[derive(Debug, Error)]
pub enum AggregatorError {
    /// A cycle was requested with an empty source registry.
    #[error("no sources configured")]
    NoSources,
}

/// Read-only snapshot of the aggregator's bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorStats {
    pub total_sources: usize,
    pub active_sources: usize,
    pub error_sources: usize,
    pub total_entries: usize,
    pub last_updated: Option<DateTime<Utc>>,
}

/// What one cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub published_entries: usize,
}

struct AggregatorState {
    sources: Vec<FeedSource>,
    published: Option<Arc<Feed>>,
}

struct SourceResult {
    index: usize,
    result: Result<Feed, FetchError>,
}

/// Merges many remote feeds into one published feed.
///
/// All state sits behind a single `RwLock`. A cycle holds the write half from
/// start to finish, so readers see either the previous or the next complete
/// state. The published feed is an `Arc` that is swapped, never edited, so a
/// reader holding one keeps a consistent feed after later cycles replace it.
pub struct Aggregator {
    title: String,
    feed_url: String,
    fetcher: Fetcher,
    state: RwLock<AggregatorState>,
}

impl Aggregator {
    /// Creates an aggregator with no sources and nothing published.
    pub fn new(title: impl Into<String>, feed_url: impl Into<String>, fetcher: Fetcher) -> Self {
        Self {
            title: title.into(),
            feed_url: feed_url.into(),
            fetcher,
            state: RwLock::new(AggregatorState {
                sources: Vec::new(),
                published: None,
            }),
        }
    }

    /// Registers a source with status `new`. Waits for any running cycle.
    pub async fn add_source(
        &self,
        url: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) {
        let source = FeedSource::new(url, name, description);
        tracing::info!(name = %source.name, url = %source.url, "Added source");
        self.state.write().await.sources.push(source);
    }

    /// Removes every source registered under `url`. Returns whether any was removed.
    pub async fn remove_source(&self, url: &str) -> bool {
        let mut state = self.state.write().await;
        let before = state.sources.len();
        state.sources.retain(|s| s.url != url);
        let removed = state.sources.len() != before;
        if removed {
            tracing::info!(url = %url, "Removed source");
        }
        removed
    }

    /// Snapshot of the source registry.
    pub async fn sources(&self) -> Vec<FeedSource> {
        self.state.read().await.sources.clone()
    }

    /// The currently published feed, if any cycle has completed.
    pub async fn published_feed(&self) -> Option<Arc<Feed>> {
        self.state.read().await.published.clone()
    }

    pub async fn stats(&self) -> AggregatorStats {
        let state = self.state.read().await;
        let count = |status: SourceStatus| state.sources.iter().filter(|s| s.status == status).count();

        AggregatorStats {
            total_sources: state.sources.len(),
            active_sources: count(SourceStatus::Active),
            error_sources: count(SourceStatus::Error),
            total_entries: state.published.as_ref().map_or(0, |f| f.items.len()),
            last_updated: state.published.as_ref().and_then(|f| f.last_updated),
        }
    }

    /// Runs one full fetch, merge and publish pass over every source.
    ///
    /// Every source is fetched concurrently. A failing source is marked
    /// `error` and left out of the merge; it never fails the cycle. Surviving
    /// entries are tagged with their source name, sorted newest first (ties
    /// keep arrival order), capped at [`MAX_ENTRIES`] and published as a new
    /// feed, even when that feed ends up empty.
    ///
    /// The write lock is held for the whole cycle, so concurrent calls run
    /// one after another.
    ///
    /// # Errors
    ///
    /// [`AggregatorError::NoSources`] if the registry is empty. Nothing is
    /// published in that case.
    pub async fn run_cycle(&self) -> Result<CycleReport, AggregatorError> {
        let mut state = self.state.write().await;

        let total = state.sources.len();
        if total == 0 {
            tracing::warn!("Aggregation cycle requested with no sources");
            return Err(AggregatorError::NoSources);
        }

        tracing::info!(sources = total, "Fetching source feeds");

        // Capacity equals the number of producers, so no fetch task ever
        // waits on the collector.
        let (tx, mut rx) = mpsc::channel::<SourceResult>(total);
        for (index, source) in state.sources.iter().enumerate() {
            let tx = tx.clone();
            let fetcher = self.fetcher.clone();
            let url = source.url.clone();
            tokio::spawn(async move {
                let result = fetcher.fetch(&url).await;
                let _ = tx.send(SourceResult { index, result }).await;
            });
        }
        drop(tx);

        // Gather everything before touching the registry, so a cycle dropped
        // mid-collection leaves no partial updates behind.
        let mut arrivals = Vec::with_capacity(total);
        while let Some(SourceResult { index, result }) = rx.recv().await {
            arrivals.push((index, result, Utc::now()));
        }

        let mut collected: Vec<Entry> = Vec::new();
        let mut reported = vec![false; total];
        let mut succeeded = 0;

        for (index, result, now) in arrivals {
            reported[index] = true;
            let source = &mut state.sources[index];

            match result {
                Ok(feed) => {
                    source.record_success(now);
                    succeeded += 1;
                    tracing::info!(
                        source = %source.name,
                        entries = feed.items.len(),
                        status = source.status.as_str(),
                        "Fetched source"
                    );
                    collected.extend(
                        feed.items
                            .into_iter()
                            .map(|entry| tag_with_source(entry, &source.name)),
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        source = %source.name,
                        url = %source.url,
                        error = %e,
                        "Failed to fetch source"
                    );
                    source.record_failure(now, e.to_string());
                }
            }
        }

        // A fetch task that panicked drops its sender without reporting.
        for (index, _) in reported.iter().enumerate().filter(|(_, done)| !**done) {
            let source = &mut state.sources[index];
            tracing::error!(source = %source.name, "Fetch task ended without a result");
            source.record_failure(Utc::now(), "fetch task ended without a result".to_string());
        }

        let entries = merge_entries(collected);
        let previous = state.published.as_ref().and_then(|f| f.last_updated);
        let feed = self.build_feed(total, entries, previous);
        let report = CycleReport {
            attempted: total,
            succeeded,
            published_entries: feed.items.len(),
        };

        state.published = Some(Arc::new(feed));

        tracing::info!(
            succeeded = report.succeeded,
            attempted = report.attempted,
            entries = report.published_entries,
            "Published aggregated feed"
        );

        Ok(report)
    }

    fn build_feed(
        &self,
        source_count: usize,
        entries: Vec<Entry>,
        previous: Option<DateTime<Utc>>,
    ) -> Feed {
        let mut feed = Feed::new(self.title.clone(), self.feed_url.clone());
        feed.set_description(format!("Aggregated content from {source_count} sources"));
        feed.set_language(AGGREGATED_LANGUAGE);
        feed.items = entries;
        feed.last_updated = Some(next_publish_time(previous));
        feed
    }
}

/// Prefixes the entry's summary with its source's display name.
fn tag_with_source(mut entry: Entry, source_name: &str) -> Entry {
    entry.summary = Some(match entry.summary.as_deref() {
        Some(summary) if !summary.is_empty() => format!("[{source_name}] {summary}"),
        _ => format!("From {source_name}"),
    });
    entry
}

/// Newest first, stable on ties, capped at [`MAX_ENTRIES`].
fn merge_entries(mut entries: Vec<Entry>) -> Vec<Entry> {
    entries.sort_by(|a, b| b.published.cmp(&a.published));
    entries.truncate(MAX_ENTRIES);
    entries
}

/// Publication time strictly later (at microsecond resolution) than `previous`.
///
/// The served validator token is derived from this timestamp, so two cycles
/// in quick succession must still publish distinct values.
fn next_publish_time(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match previous {
        Some(prev) if now.timestamp_micros() <= prev.timestamp_micros() => {
            prev + ChronoDuration::microseconds(1)
        }
        _ => now,
    }
}
