//! Web layer - HTTP handlers and routing
//!
//! - Public pages and the blog search endpoint
//! - The admin panel behind the session login
//! - Static files under `/static`

pub mod admin;
pub mod forms;
pub mod middleware;
pub mod public;
pub mod responses;
pub mod search;
pub mod session;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::get,
    Router,
};
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

pub use middleware::{AppState, WebError};
pub use session::{Session, SessionManager};

/// Build the complete router with middleware
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(public::index))
        .route("/about", get(public::about))
        .route("/blog", get(public::blog))
        .route("/blog/{slug}", get(public::blog_detail))
        .route("/testimonials", get(public::testimonials))
        .route("/contact", get(public::contact))
        .route("/api/blog/search", get(search::search_posts));

    Router::new()
        .merge(public_routes)
        .merge(admin::router(state.clone()))
        .nest_service("/static", ServeDir::new(&state.static_dir))
        .fallback(middleware::not_found)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::error_pages,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            session::session_layer,
        ))
        .layer(DefaultBodyLimit::max(state.upload_config.max_content_length))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
