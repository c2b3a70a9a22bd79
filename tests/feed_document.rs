//! Integration tests for BEAM documents as exchanged on the wire: parsing
//! foreign JSON, round-tripping, extensions and content hashing.

use beam::integrity::{compute_content_hash, IntegrityError};
use beam::model::{Entry, ExtensionKey, Feed, FeedError, VERSION};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;

fn sample_feed() -> Feed {
    let mut feed = Feed::new("Feed 01", "http://localhost:8081/feed.json");
    feed.set_description("Latest technology news and startup coverage");
    feed.set_home_page_url("http://localhost:8081");
    feed.set_language("en-US");
    feed.set_author("Jane Doe", "jane@example.com", "");

    let mut first = Entry::new(
        "post-1",
        "Getting Started with Rust",
        "https://example.com/post-1",
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
    );
    first.set_content("<p>Ownership and borrowing</p>");
    first.set_tags(["rust", "tutorial"]);
    first.set_category("Programming");
    first.set_extension(ExtensionKey::VIEWS, 42);
    feed.add_entry(first);

    let mut second = Entry::new(
        "post-2",
        "Async in Practice",
        "https://example.com/post-2",
        Utc.with_ymd_and_hms(2025, 1, 2, 9, 30, 0).unwrap(),
    );
    second.set_summary("Tokio from the ground up");
    second.set_image("https://example.com/img/2.png");
    feed.add_entry(second);

    feed
}

#[test]
fn test_round_trip_preserves_document() {
    let feed = sample_feed();
    let json = feed.to_json().unwrap();
    let parsed = Feed::from_json(json.as_bytes()).unwrap();

    assert!(parsed.validate().is_ok());
    assert_eq!(parsed.title, feed.title);
    assert_eq!(parsed.feed_url, feed.feed_url);
    assert_eq!(parsed.items.len(), feed.items.len());
    assert_eq!(parsed, feed);
}

#[test]
fn test_hash_is_stable_across_round_trip() {
    let feed = sample_feed();
    let hash = feed.content_hash().unwrap();

    let parsed = Feed::from_json(feed.to_json().unwrap().as_bytes()).unwrap();
    assert_eq!(parsed.content_hash().unwrap(), hash);
    assert!(parsed.validate_content_hash(&hash).is_ok());
}

#[test]
fn test_tampered_entry_fails_hash_check() {
    let feed = sample_feed();
    let hash = feed.content_hash().unwrap();

    let mut tampered = feed.clone();
    tampered.items[1].title = "Async in Practice (edited)".to_string();
    match tampered.validate_content_hash(&hash) {
        Err(IntegrityError::Mismatch { expected, actual }) => {
            assert_eq!(expected, hash);
            assert_eq!(actual, compute_content_hash(&tampered.items).unwrap());
        }
        other => panic!("expected mismatch, got {other:?}"),
    }
}

#[test]
fn test_parse_foreign_document() {
    let doc = json!({
        "version": "1.0",
        "title": "Feed 02",
        "feed_url": "http://localhost:8082/feed.json",
        "items": [{
            "id": "hn-1",
            "title": "Show HN: a feed format",
            "url": "https://news.example.com/item?id=1",
            "published": "2025-03-10T14:00:00+02:00",
            "tags": ["show"],
            "reading_time": 3,
            "_comments": 17,
            "_ratings": { "up": 40, "down": 2 },
            "unknown_field": true
        }]
    });

    let feed = Feed::from_json(doc.to_string().as_bytes()).unwrap();
    let entry = &feed.items[0];
    assert_eq!(
        entry.published,
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    );
    assert_eq!(entry.reading_time, Some(3));
    assert_eq!(entry.extension(&ExtensionKey::COMMENTS), Some(&json!(17)));
    assert_eq!(
        entry.extension(&ExtensionKey::RATINGS),
        Some(&json!({ "up": 40, "down": 2 }))
    );
    assert_eq!(entry.extensions.len(), 2);
    assert!(feed.last_updated.is_none());
}

#[test]
fn test_absent_fields_are_omitted() {
    let mut feed = Feed::new("Minimal", "https://example.com/feed.json");
    feed.add_entry(Entry::new(
        "only",
        "Only entry",
        "https://example.com/only",
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    ));

    let value: serde_json::Value = serde_json::from_str(&feed.to_json().unwrap()).unwrap();
    assert_eq!(value["version"], VERSION);
    for absent in ["description", "home_page_url", "language", "author"] {
        assert!(value.get(absent).is_none(), "{absent} should be omitted");
    }

    let item = &value["items"][0];
    for absent in [
        "content",
        "summary",
        "updated",
        "author",
        "tags",
        "category",
        "image",
        "reading_time",
    ] {
        assert!(item.get(absent).is_none(), "{absent} should be omitted");
    }
}

#[test]
fn test_wrong_version_rejected() {
    let doc = json!({
        "version": "2.0",
        "title": "Future",
        "feed_url": "https://example.com/feed.json",
        "items": []
    });

    let err = Feed::from_json(doc.to_string().as_bytes()).unwrap_err();
    match err {
        FeedError::Validation(e) => assert_eq!(e.field, "version"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_entry_without_published_rejected() {
    let doc = json!({
        "version": "1.0",
        "title": "Feed",
        "feed_url": "https://example.com/feed.json",
        "items": [{ "id": "x", "title": "X", "url": "https://example.com/x" }]
    });

    let err = Feed::from_json(doc.to_string().as_bytes()).unwrap_err();
    match err {
        FeedError::Validation(e) => {
            assert_eq!(e.field, "published");
            assert_eq!(e.entry, Some(0));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_malformed_json_is_parse_error() {
    assert!(matches!(
        Feed::from_json(b"{\"version\": "),
        Err(FeedError::Parse(_))
    ));
}

#[test]
fn test_zero_time_published_rejected_but_epoch_accepted() {
    let doc = |published: &str| {
        json!({
            "version": "1.0",
            "title": "Feed",
            "feed_url": "https://example.com/feed.json",
            "items": [{
                "id": "x",
                "title": "X",
                "url": "https://example.com/x",
                "published": published
            }]
        })
        .to_string()
    };

    match Feed::from_json(doc("0001-01-01T00:00:00Z").as_bytes()) {
        Err(FeedError::Validation(e)) => assert_eq!(e.field, "published"),
        other => panic!("expected validation error, got {other:?}"),
    }

    let feed = Feed::from_json(doc("1970-01-01T00:00:00Z").as_bytes()).unwrap();
    assert_eq!(feed.items[0].published.timestamp(), 0);
}

#[test]
fn test_null_items_and_tags_accepted() {
    let doc = json!({
        "version": "1.0",
        "title": "Nil slices",
        "feed_url": "https://example.com/feed.json",
        "items": null
    });
    let feed = Feed::from_json(doc.to_string().as_bytes()).unwrap();
    assert!(feed.items.is_empty());

    let doc = json!({
        "version": "1.0",
        "title": "Nil tags",
        "feed_url": "https://example.com/feed.json",
        "items": [{
            "id": "x",
            "title": "X",
            "url": "https://example.com/x",
            "published": "2025-01-01T00:00:00Z",
            "tags": null
        }]
    });
    let feed = Feed::from_json(doc.to_string().as_bytes()).unwrap();
    assert!(feed.items[0].tags.is_empty());
}
