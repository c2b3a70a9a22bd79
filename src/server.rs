//! HTTP API for the aggregated feed.
//!
//! | Route             | Response                                              |
//! |-------------------|-------------------------------------------------------|
//! | `GET /feed.json`  | merged feed with conditional GET (`ETag`), `503` until first publish |
//! | `GET /stats`      | [`AggregatorStats`] as JSON                           |
//! | `GET /sources`    | source registry as JSON                               |
//! | `POST /refresh`   | runs one cycle, returns its [`CycleReport`]           |
//!
//! Per-source failures never surface as HTTP errors here; the merged feed
//! just lacks that source's entries, and `/stats` or `/sources` show why.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};

use crate::aggregator::{Aggregator, AggregatorError, AggregatorStats, CycleReport, FeedSource};
use crate::model::{Feed, CONTENT_TYPE_JSON, DEFAULT_CACHE_CONTROL};

/// Build the HTTP API router over a shared aggregator.
pub fn build_router(aggregator: Arc<Aggregator>) -> Router {
    Router::new()
        .route("/feed.json", get(feed_handler))
        .route("/stats", get(stats_handler))
        .route("/sources", get(sources_handler))
        .route("/refresh", post(refresh_handler))
        .with_state(aggregator)
}

/// Validator token for a feed: changes whenever `last_updated` or the item
/// count does.
pub fn entity_tag(feed: &Feed) -> String {
    let stamp = feed.last_updated.map_or(0, |t| t.timestamp_micros());
    format!("\"beam-{}-{}\"", stamp, feed.items.len())
}

/// IMF-fixdate, as used by `Last-Modified`.
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Renders a published feed, answering `304` when `if_none_match` equals its
/// current validator token.
pub fn render_feed(feed: &Feed, if_none_match: Option<&HeaderValue>) -> Response {
    let etag = entity_tag(feed);

    let not_modified = if_none_match
        .and_then(|v| v.to_str().ok())
        .is_some_and(|presented| presented == etag);

    let mut response = if not_modified {
        StatusCode::NOT_MODIFIED.into_response()
    } else {
        match feed.to_json() {
            Ok(body) => (StatusCode::OK, body).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize aggregated feed");
                return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                    .into_response();
            }
        }
    };

    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(CONTENT_TYPE_JSON),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(DEFAULT_CACHE_CONTROL),
    );
    if let Some(updated) = feed.last_updated {
        if let Ok(value) = HeaderValue::from_str(&http_date(updated)) {
            headers.insert(header::LAST_MODIFIED, value);
        }
    }
    if let Ok(value) = HeaderValue::from_str(&etag) {
        headers.insert(header::ETAG, value);
    }

    response
}

async fn feed_handler(
    State(aggregator): State<Arc<Aggregator>>,
    request_headers: HeaderMap,
) -> Response {
    // The read lock is released here; the Arc keeps this version alive.
    let Some(feed) = aggregator.published_feed().await else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            "Aggregated feed not available",
        )
            .into_response();
    };

    render_feed(&feed, request_headers.get(header::IF_NONE_MATCH))
}

async fn stats_handler(State(aggregator): State<Arc<Aggregator>>) -> Json<AggregatorStats> {
    Json(aggregator.stats().await)
}

async fn sources_handler(State(aggregator): State<Arc<Aggregator>>) -> Json<Vec<FeedSource>> {
    Json(aggregator.sources().await)
}

async fn refresh_handler(
    State(aggregator): State<Arc<Aggregator>>,
) -> Result<Json<CycleReport>, (StatusCode, String)> {
    match aggregator.run_cycle().await {
        Ok(report) => Ok(Json(report)),
        Err(e @ AggregatorError::NoSources) => {
            Err((StatusCode::SERVICE_UNAVAILABLE, e.to_string()))
        }
    }
}
