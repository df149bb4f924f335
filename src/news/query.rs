//! Recent-entries query service.

use std::sync::Arc;

use thiserror::Error;

use crate::error::NewsError;
use crate::news::store::EntryStore;
use crate::news::types::Entry;

/// Error returned by [`QueryService::get_recent`].
#[derive(Error, Debug)]
pub enum QueryError {
    /// The count parameter is not a non-negative integer.
    #[error("Invalid count parameter")]
    InvalidCount(String),

    /// The store failed to answer.
    #[error("{0}")]
    Store(#[from] NewsError),
}

/// Largest accepted count, the range of a SQLite integer.
const MAX_COUNT: u64 = i64::MAX as u64;

/// Translates a retrieval request into a store read.
#[derive(Clone)]
pub struct QueryService {
    store: Arc<dyn EntryStore>,
}

impl QueryService {
    /// Create a query service reading from `store`.
    pub fn new(store: Arc<dyn EntryStore>) -> Self {
        Self { store }
    }

    /// Parse a count parameter as a non-negative integer.
    ///
    /// Any value up to `i64::MAX` is accepted; counts beyond the stored
    /// entries simply return everything.
    pub fn parse_count(param: &str) -> Result<u64, QueryError> {
        param
            .parse::<u64>()
            .ok()
            .filter(|count| *count <= MAX_COUNT)
            .ok_or_else(|| QueryError::InvalidCount(param.to_string()))
    }

    /// Return up to `count_param` most recent entries, newest `pubDate` first.
    ///
    /// The store is not touched when the parameter is invalid.
    pub async fn get_recent(&self, count_param: &str) -> Result<Vec<Entry>, QueryError> {
        let count = Self::parse_count(count_param)?;
        Ok(self.store.query_recent(count).await?)
    }
}
