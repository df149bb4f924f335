//! Test helpers for integration tests.
//!
//! Provides feed fixtures, a mock feed server and a file-backed store.

#![allow(dead_code)]

use std::time::Duration;

use newsfeed::NewsStore;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Default timeout for test operations.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Source that refuses connections.
pub const UNREACHABLE_SOURCE: &str = "http://127.0.0.1:1/rss";

/// Build an RSS 2.0 document from `(title, pubDate)` pairs.
pub fn rss_feed(items: &[(&str, &str)]) -> String {
    let items: String = items
        .iter()
        .map(|(title, pub_date)| {
            format!(
                "<item><title>{title}</title><description>about {title}</description>\
                 <link>https://news.example.com/{title}</link><pubDate>{pub_date}</pubDate></item>"
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0"><channel><title>Test</title>{items}</channel></rss>"#
    )
}

/// Start a mock server answering `route` with `body`.
pub async fn feed_server(route: &str, body: impl Into<String>) -> MockServer {
    let server = MockServer::start().await;
    mount_feed(&server, route, body).await;
    server
}

/// Mount `body` as an RSS response at `route`.
pub async fn mount_feed(server: &MockServer, route: &str, body: impl Into<String>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/rss+xml")
                .set_body_string(body.into()),
        )
        .mount(server)
        .await;
}

/// Open a store backed by a database file in a fresh temporary directory.
pub async fn file_store() -> (NewsStore, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = NewsStore::open(dir.path().join("rss.db"))
        .await
        .expect("Failed to open store");
    (store, dir)
}
