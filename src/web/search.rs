//! Blog search endpoint
//!
//! GET /api/blog/search?q=... returns up to ten published posts as
//! `[{id, title, slug, excerpt, url}]`. A missing or blank query returns `[]`.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::models::SearchResult;
use crate::web::middleware::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub async fn search_posts(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let q = query.q.unwrap_or_default();

    match state.blog_service.search(&q).await {
        Ok(results) => Json(results).into_response(),
        Err(e) => {
            tracing::error!("Error searching blog posts: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Vec::<SearchResult>::new()),
            )
                .into_response()
        }
    }
}
