//! Web module for newsfeed.
//!
//! Serves `GET /api/news/{count}` as JSON and every other path from the
//! static directory.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
