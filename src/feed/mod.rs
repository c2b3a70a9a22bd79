//! Retrieval of remote BEAM feeds.
//!
//! [`Fetcher`] performs one bounded-time GET, decodes the body as BEAM JSON
//! and validates it. It never retries; the aggregator simply tries again on
//! its next cycle.
//!
//! # Example
//!
//! ```ignore
//! use beam::feed::{build_client, Fetcher, DEFAULT_FETCH_TIMEOUT};
//!
//! let fetcher = Fetcher::new(build_client()?, DEFAULT_FETCH_TIMEOUT);
//! let feed = fetcher.fetch("http://localhost:8081/feed.json").await?;
//! ```

mod fetcher;

pub use fetcher::{build_client, FetchError, Fetcher, DEFAULT_FETCH_TIMEOUT};
