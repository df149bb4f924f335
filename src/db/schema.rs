//! Database schema and migrations for newsfeed.
//!
//! Migrations are applied in order when the database is opened. The
//! `schema_version` table tracks which ones have already run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: News entries. pubDate keeps the feed's own date text, unparsed.
    r#"
CREATE TABLE IF NOT EXISTS news (
    id          INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
    title       TEXT,
    description TEXT,
    link        TEXT,
    pubDate     TEXT
);

CREATE INDEX IF NOT EXISTS idx_news_pub_date ON news(pubDate);
"#,
];
