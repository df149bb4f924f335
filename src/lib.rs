//! newsfeed - RSS aggregator
//!
//! Periodically polls a fixed set of RSS feeds, stores every item in SQLite
//! and serves the most recent ones over HTTP.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod news;
pub mod web;

pub use config::Config;
pub use db::Database;
pub use error::{NewsError, Result};
pub use news::{
    start_scheduler, Entry, EntryStore, Fetcher, NewsStore, QueryError, QueryService, Scheduler,
    SourcePoller,
};
pub use web::WebServer;
