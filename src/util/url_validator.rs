use thiserror::Error;
use url::Url;

/// Errors that can occur when validating a source URL from configuration.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,
}

/// The protocol's URL rule: non-empty and prefixed with `http://` or `https://`.
///
/// This is the check applied by feed and entry validation. It is a prefix
/// test only, so documents produced by other implementations validate the
/// same way here.
///
/// # Examples
///
/// ```
/// use beam::util::is_http_url;
///
/// assert!(is_http_url("http://localhost:8081/feed.json"));
/// assert!(!is_http_url("ftp://example.com"));
/// assert!(!is_http_url(""));
/// ```
pub fn is_http_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Checks that a URL used as an aggregation source parses as http(s) with a host.
///
/// Sources are registered from configuration, where a typo should fail at
/// startup rather than show up later as a per-cycle fetch error. Local and
/// private hosts are accepted since sources commonly run next to the
/// aggregator.
///
/// # Errors
///
/// - [`UrlValidationError::InvalidUrl`] if the string does not parse
/// - [`UrlValidationError::UnsupportedScheme`] for anything but http/https
/// - [`UrlValidationError::MissingHost`] if the URL has no host
pub fn validate_source_url(url_str: &str) -> Result<(), UrlValidationError> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(())
}
