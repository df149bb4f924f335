//! News ingestion and retrieval.
//!
//! The scheduler polls every configured feed on a fixed period, the fetcher
//! turns each feed into entries, the store persists them and the query
//! service reads the most recent ones back.

pub mod fetcher;
pub mod parser;
pub mod query;
pub mod scheduler;
pub mod store;
pub mod types;

pub use fetcher::{validate_source, Fetcher};
pub use parser::parse_entries;
pub use query::{QueryError, QueryService};
pub use scheduler::{start_scheduler, Scheduler, SourcePoller};
pub use store::{EntryStore, NewsStore};
pub use types::{CycleReport, Entry, MAX_FEED_SIZE};
