//! Entry persistence.
//!
//! [`EntryStore`] is the contract the scheduler, fetcher and query service
//! depend on; [`NewsStore`] is the SQLite implementation.

use std::path::Path;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::db::Database;
use crate::news::types::Entry;
use crate::Result;

/// Append-only entry storage with ordered recent-N reads.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Persist one entry and return its row id.
    async fn insert(&self, entry: &Entry) -> Result<i64>;

    /// Return up to `limit` entries ordered by `pubDate` text, descending.
    ///
    /// The comparison is plain byte order over the stored text, so dates
    /// written in different formats do not interleave chronologically.
    async fn query_recent(&self, limit: u64) -> Result<Vec<Entry>>;

    /// Persist one entry, logging and swallowing any failure.
    ///
    /// Returns whether the entry was stored.
    async fn append(&self, entry: &Entry) -> bool {
        match self.insert(entry).await {
            Ok(id) => {
                debug!(id, link = %entry.link, "Stored entry");
                true
            }
            Err(e) => {
                error!(link = %entry.link, "Failed to store entry: {}", e);
                false
            }
        }
    }
}

/// Row type for a news entry; every column is nullable.
#[derive(Debug, sqlx::FromRow)]
struct EntryRow {
    title: Option<String>,
    description: Option<String>,
    link: Option<String>,
    #[sqlx(rename = "pubDate")]
    pub_date: Option<String>,
}

impl From<EntryRow> for Entry {
    fn from(row: EntryRow) -> Self {
        Entry {
            title: row.title.unwrap_or_default(),
            description: row.description.unwrap_or_default(),
            link: row.link.unwrap_or_default(),
            pub_date: row.pub_date.unwrap_or_default(),
        }
    }
}

/// SQLite-backed entry store.
///
/// Writes go through an internal lock so concurrent appends from one poll
/// cycle are applied one at a time; reads are not serialized.
#[derive(Debug)]
pub struct NewsStore {
    db: Database,
    write_lock: Mutex<()>,
}

impl NewsStore {
    /// Open (or create) the store at `path` and ensure the schema exists.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Database::open(path).await?;
        Ok(Self::new(db))
    }

    /// Open an in-memory store.
    pub async fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory().await?;
        Ok(Self::new(db))
    }

    /// Wrap an already-opened database.
    pub fn new(db: Database) -> Self {
        Self {
            db,
            write_lock: Mutex::new(()),
        }
    }

    /// Ensure the entry schema exists. Safe to call repeatedly.
    pub async fn initialize(&self) -> Result<()> {
        self.db.migrate().await
    }

    /// Get the underlying database.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Count all stored entries.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM news")
            .fetch_one(self.db.pool())
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl EntryStore for NewsStore {
    async fn insert(&self, entry: &Entry) -> Result<i64> {
        let _guard = self.write_lock.lock().await;

        let result = sqlx::query(
            "INSERT INTO news (title, description, link, pubDate) VALUES (?, ?, ?, ?)",
        )
        .bind(&entry.title)
        .bind(&entry.description)
        .bind(&entry.link)
        .bind(&entry.pub_date)
        .execute(self.db.pool())
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn query_recent(&self, limit: u64) -> Result<Vec<Entry>> {
        let rows = sqlx::query_as::<_, EntryRow>(
            "SELECT title, description, link, pubDate
             FROM news
             ORDER BY pubDate DESC, id DESC
             LIMIT ?",
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(Entry::from).collect())
    }
}
