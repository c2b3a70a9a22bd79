//! BEAM feed aggregation.
//!
//! Fetches remote BEAM JSON feeds concurrently, merges them into a single
//! newest-first feed and serves it over HTTP with conditional GET support.

pub mod aggregator;
pub mod config;
pub mod feed;
pub mod integrity;
pub mod model;
pub mod server;
pub mod util;
