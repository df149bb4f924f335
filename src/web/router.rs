//! Router configuration for the Web API.

use std::path::Path;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{get_recent_news, AppState};

/// Create the main router.
///
/// `/api/news/:count` is served by the API; every other path is looked up
/// in `static_dir`.
pub fn create_router(app_state: Arc<AppState>, static_dir: impl AsRef<Path>) -> Router {
    let api_routes = Router::new().route("/news/:count", get(get_recent_news));

    Router::new()
        .nest("/api", api_routes)
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
