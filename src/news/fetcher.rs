//! Feed fetcher.
//!
//! Retrieves one feed source over HTTP, decodes it into entries and hands
//! each entry to the store. Every failure is terminal for that source in the
//! current cycle: it is logged and the source contributes zero entries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::FetchConfig;
use crate::error::{NewsError, Result};
use crate::news::parser::parse_entries;
use crate::news::scheduler::SourcePoller;
use crate::news::store::EntryStore;
use crate::news::types::{Entry, MAX_FEED_SIZE};

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// User agent string for feed fetching.
const USER_AGENT: &str = concat!("newsfeed/", env!("CARGO_PKG_VERSION"));

/// HTTP feed fetcher.
///
/// Without a timeout a non-responsive source keeps its fetch open until the
/// transport gives up, which also holds the current poll cycle open.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    max_feed_size: u64,
}

impl Fetcher {
    /// Create a fetcher with no deadline and the default size cap.
    pub fn new() -> Result<Self> {
        Self::with_options(None, MAX_FEED_SIZE)
    }

    /// Create a fetcher from the fetch configuration section.
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        Self::with_options(config.timeout(), config.max_feed_size_bytes)
    }

    /// Create a fetcher with an optional total deadline per fetch.
    pub fn with_options(timeout: Option<Duration>, max_feed_size: u64) -> Result<Self> {
        let mut builder = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| NewsError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_feed_size,
        })
    }

    /// Fetch and decode one source, reporting failures to the caller.
    pub async fn try_fetch(&self, source: &str) -> Result<Vec<Entry>> {
        validate_source(source)?;

        let mut response = self
            .client
            .get(source)
            .send()
            .await
            .map_err(|e| NewsError::Fetch(format!("failed to fetch feed: {}", e)))?;

        if !response.status().is_success() {
            return Err(NewsError::Fetch(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > self.max_feed_size {
                return Err(NewsError::Fetch(format!(
                    "feed too large: {} bytes (max {} bytes)",
                    content_length, self.max_feed_size
                )));
            }
        }

        // Content-Length may be missing or wrong, so the cap is enforced on
        // the bytes actually received.
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| NewsError::Fetch(format!("failed to read response: {}", e)))?
        {
            if (body.len() + chunk.len()) as u64 > self.max_feed_size {
                return Err(NewsError::Fetch(format!(
                    "feed too large: exceeds {} bytes",
                    self.max_feed_size
                )));
            }
            body.extend_from_slice(&chunk);
        }

        parse_entries(&body)
    }

    /// Fetch and decode one source.
    ///
    /// Network and decoding failures are logged and yield no entries.
    pub async fn fetch(&self, source: &str) -> Vec<Entry> {
        match self.try_fetch(source).await {
            Ok(entries) => {
                debug!(source, count = entries.len(), "Fetched feed");
                entries
            }
            Err(e) => {
                warn!(source, "Failed to fetch feed: {}", e);
                Vec::new()
            }
        }
    }

    /// Fetch one source and append every decoded entry to `store`.
    ///
    /// Returns the number of entries stored.
    pub async fn fetch_into(&self, source: &str, store: &dyn EntryStore) -> usize {
        let entries = self.fetch(source).await;
        let total = entries.len();

        let mut stored = 0;
        for entry in &entries {
            if store.append(entry).await {
                stored += 1;
            }
        }

        if stored < total {
            warn!(source, stored, total, "Some entries could not be stored");
        } else if stored > 0 {
            info!(source, stored, "Feed updated");
        }
        stored
    }
}

#[async_trait]
impl SourcePoller for Fetcher {
    async fn poll(&self, source: &str, store: &dyn EntryStore) -> usize {
        self.fetch_into(source, store).await
    }
}

/// Check that a source is an absolute http(s) URL.
pub fn validate_source(source: &str) -> Result<()> {
    let parsed =
        url::Url::parse(source).map_err(|e| NewsError::Fetch(format!("invalid URL: {}", e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(NewsError::Fetch(format!(
            "unsupported URL scheme: {}",
            scheme
        ))),
    }
}
