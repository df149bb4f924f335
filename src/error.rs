//! Error types for newsfeed.

use thiserror::Error;

/// Common error type for newsfeed.
#[derive(Error, Debug)]
pub enum NewsError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Network failure while retrieving a feed.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Feed payload could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<sqlx::Error> for NewsError {
    fn from(e: sqlx::Error) -> Self {
        NewsError::Database(e.to_string())
    }
}

/// Result type alias for newsfeed operations.
pub type Result<T> = std::result::Result<T, NewsError>;
