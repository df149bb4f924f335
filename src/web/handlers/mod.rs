//! API handlers.

pub mod news;

pub use news::*;

use std::sync::Arc;

use crate::news::{EntryStore, QueryService};

/// Shared state for API handlers.
#[derive(Clone)]
pub struct AppState {
    /// Recent-news query service.
    pub query: QueryService,
}

impl AppState {
    /// Create application state reading from `store`.
    pub fn new(store: Arc<dyn EntryStore>) -> Self {
        Self {
            query: QueryService::new(store),
        }
    }
}
