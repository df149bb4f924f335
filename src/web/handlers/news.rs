//! News handlers for the Web API.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::news::Entry;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// GET /api/news/:count - Most recent entries, newest `pubDate` first.
pub async fn get_recent_news(
    State(state): State<Arc<AppState>>,
    Path(count): Path<String>,
) -> Result<Json<Vec<Entry>>, ApiError> {
    let entries = state.query.get_recent(&count).await?;
    Ok(Json(entries))
}
