//! News types for newsfeed.

use serde::Serialize;

/// Default maximum feed size in bytes (5MB).
pub const MAX_FEED_SIZE: u64 = 5 * 1024 * 1024;

/// One syndicated item.
///
/// Serializes as `{"title","description","link","pubDate"}` in that order.
/// `pub_date` is the feed's own date text and is never normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Item title, possibly empty.
    pub title: String,
    /// Item description, possibly empty.
    pub description: String,
    /// Item link, possibly empty.
    pub link: String,
    /// Publication date exactly as the feed wrote it.
    #[serde(rename = "pubDate")]
    pub pub_date: String,
}

impl Entry {
    /// Create an entry with a title and every other field empty.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the link.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    /// Set the publication date text.
    pub fn with_pub_date(mut self, pub_date: impl Into<String>) -> Self {
        self.pub_date = pub_date.into();
        self
    }
}

/// Summary of one poll cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Number of sources polled.
    pub sources: usize,
    /// Number of entries persisted across all sources.
    pub entries: usize,
}
