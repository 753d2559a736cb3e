//! EPUB reader endpoints
//!
//! - `GET /:book_id/content` - full book with sanitized chapters
//! - `GET /:book_id/chapter/:index` - one chapter by 0-based index
//! - `GET /:book_id/search?q=&limit=` - full-text search
//! - `GET /:book_id/toc` - table of contents

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::ApiResponse;
use crate::epub::{BookContent, Chapter, SearchResults, TableOfContents};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create the EPUB router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:book_id/content", get(get_content))
        .route("/:book_id/chapter/:index", get(get_chapter))
        .route("/:book_id/search", get(search_book))
        .route("/:book_id/toc", get(get_toc))
}

async fn get_content(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
) -> Result<Json<ApiResponse<BookContent>>> {
    let content = state.reader().content(&book_id).await?;
    Ok(Json(ApiResponse::ok(content)))
}

async fn get_chapter(
    State(state): State<AppState>,
    Path((book_id, index)): Path<(String, String)>,
) -> Result<Json<ApiResponse<Chapter>>> {
    let index: i64 = index
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid chapter index: {}", index)))?;

    let chapter = state.reader().chapter(&book_id, index).await?;
    Ok(Json(ApiResponse::ok(chapter)))
}

/// Query parameters for in-book search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search query
    #[serde(default)]
    pub q: String,
    /// Maximum results; kept as text so a malformed value falls back to the default
    pub limit: Option<String>,
}

/// Search a book
///
/// GET /api/v1/epub/:book_id/search?q=الحب&limit=10
async fn search_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchResults>>> {
    let search = &state.config().search;
    let limit = query
        .limit
        .as_deref()
        .and_then(|l| l.trim().parse::<usize>().ok())
        .unwrap_or(search.default_limit)
        .min(search.max_limit);

    let results = state.reader().search(&book_id, &query.q, limit).await?;
    Ok(Json(ApiResponse::ok(results)))
}

async fn get_toc(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
) -> Result<Json<ApiResponse<TableOfContents>>> {
    let toc = state.reader().table_of_contents(&book_id).await?;
    Ok(Json(ApiResponse::ok(toc)))
}
