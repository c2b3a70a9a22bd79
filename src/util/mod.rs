//! Utility functions shared by the content model and the configuration layer.
//!
//! - **URL checks**: the protocol's prefix rule for feed/entry URLs, plus a
//!   stricter parse used when registering sources from configuration
//! - **Text processing**: HTML tag stripping and reading-time estimation
//!
//! # Examples
//!
//! ```
//! use beam::util::{is_http_url, reading_time_minutes};
//!
//! assert!(is_http_url("https://example.com/feed.json"));
//! assert_eq!(reading_time_minutes("<p>short post</p>"), Some(1));
//! ```

mod text;
mod url_validator;

pub use text::{reading_time_minutes, strip_html_tags, word_count, WORDS_PER_MINUTE};
pub use url_validator::{is_http_url, validate_source_url, UrlValidationError};
