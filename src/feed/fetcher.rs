use std::time::Duration;

use futures::StreamExt;
use thiserror::Error;

use crate::model::{Feed, FeedError, ValidationError};

/// Per-source timeout used when none is configured.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB
const USER_AGENT: &str = concat!("beam-aggregator/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur while retrieving a single source feed.
///
/// Covers the whole attempt: transport, HTTP status, body decoding and
/// structural validation of what was decoded.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection refused, TLS, reset, etc.)
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// The attempt did not finish within the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Body is not a well-formed BEAM JSON document
    #[error("JSON decode error: {0}")]
    Decode(#[source] serde_json::Error),
    /// Body decoded but the feed is structurally invalid
    #[error("feed validation error: {0}")]
    Invalid(#[source] ValidationError),
}

impl From<FeedError> for FetchError {
    fn from(err: FeedError) -> Self {
        match err {
            FeedError::Parse(e) => FetchError::Decode(e),
            FeedError::Validation(e) => FetchError::Invalid(e),
        }
    }
}

/// Builds the HTTP client shared by every fetch.
pub fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().user_agent(USER_AGENT).build()
}

/// Retrieves, decodes and validates one remote BEAM feed.
///
/// Each call makes exactly one attempt. Retrying is left to the caller, which
/// for the aggregator means the next cycle.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl Fetcher {
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetches the feed at `url`.
    ///
    /// The timeout bounds the whole attempt: connecting, waiting for headers
    /// and reading the body.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Network`] - Connection or TLS errors
    /// - [`FetchError::Timeout`] - Attempt exceeded the configured timeout
    /// - [`FetchError::HttpStatus`] - Non-2xx HTTP response
    /// - [`FetchError::ResponseTooLarge`] - Body exceeded 10MB
    /// - [`FetchError::Decode`] - Body is not BEAM JSON
    /// - [`FetchError::Invalid`] - Decoded feed failed validation
    pub async fn fetch(&self, url: &str) -> Result<Feed, FetchError> {
        tokio::time::timeout(self.timeout, self.fetch_once(url))
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))?
    }

    async fn fetch_once(&self, url: &str) -> Result<Feed, FetchError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }

        let bytes = read_limited_bytes(response, MAX_FEED_SIZE).await?;
        let feed = Feed::from_json(&bytes)?;

        tracing::debug!(
            url = %url,
            bytes = bytes.len(),
            entries = feed.items.len(),
            "Fetched source feed"
        );

        Ok(feed)
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
