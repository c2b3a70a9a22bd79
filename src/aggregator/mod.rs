//! The aggregation engine.
//!
//! - [`FeedSource`] / [`SourceStatus`]: the registry of remote feeds and the
//!   outcome of each one's last fetch
//! - [`Aggregator`]: concurrent fetch, merge, sort, cap and atomic publish
//! - [`Scheduler`]: the periodic refresh task
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use beam::aggregator::{Aggregator, Scheduler};
//! use beam::feed::{build_client, Fetcher, DEFAULT_FETCH_TIMEOUT};
//!
//! let fetcher = Fetcher::new(build_client()?, DEFAULT_FETCH_TIMEOUT);
//! let aggregator = Arc::new(Aggregator::new("Tech News", "http://localhost:8181/feed.json", fetcher));
//! aggregator.add_source("http://localhost:8081/feed.json", "Feed 01", "Web development").await;
//!
//! let report = aggregator.run_cycle().await?;
//! let scheduler = Scheduler::start(aggregator.clone(), Duration::from_secs(300));
//! ```

mod engine;
mod scheduler;
mod source;

pub use engine::{Aggregator, AggregatorError, AggregatorStats, CycleReport, MAX_ENTRIES};
pub use scheduler::Scheduler;
pub use source::{FeedSource, SourceStatus};
