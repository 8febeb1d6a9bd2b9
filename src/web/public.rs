//! Public site pages
//!
//! - GET / - home
//! - GET /about - story, mission, vision, values and team
//! - GET /blog - published posts, paginated and filterable by category
//! - GET /blog/{slug} - a single published post
//! - GET /testimonials - farmer testimonials
//! - GET /contact - contact details from the site settings

use axum::{
    extract::{Path, Query, State},
    response::Html,
};
use serde::Deserialize;
use tera::Context as TeraContext;

use crate::services::blog::BlogListing;
use crate::services::content::{AboutPage, HomePage, TestimonialsPage};
use crate::services::BlogServiceError;
use crate::web::middleware::{AppState, WebError};
use crate::web::responses::render_page;
use crate::web::session::Session;

#[derive(Debug, Default, Deserialize)]
pub struct BlogQuery {
    pub page: Option<String>,
    pub category: Option<String>,
}

/// 1-based page number; anything unparsable is page 1
pub fn page_number(raw: &Option<String>) -> u32 {
    raw.as_deref()
        .and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1)
}

pub async fn index(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, WebError> {
    let page = state.content_service.home_page().await.unwrap_or_else(|e| {
        tracing::error!("Error loading home page: {}", e);
        HomePage::default()
    });

    let mut context = TeraContext::new();
    context.insert("hero", &page.hero);
    context.insert("about_cards", &page.about_cards);
    context.insert("features", &page.features);
    context.insert("stats", &page.stats);

    render_page(&state, &session, "public/index.html", &context, "/").await
}

pub async fn about(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, WebError> {
    let page = state.content_service.about_page().await.unwrap_or_else(|e| {
        tracing::error!("Error loading about page: {}", e);
        AboutPage::default()
    });

    let mut context = TeraContext::new();
    context.insert("story", &page.story);
    context.insert("mission", &page.mission);
    context.insert("vision", &page.vision);
    context.insert("values", &page.values);
    context.insert("leadership", &page.leadership);
    context.insert("team", &page.team);

    render_page(&state, &session, "public/about.html", &context, "/about").await
}

pub async fn blog(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<BlogQuery>,
) -> Result<Html<String>, WebError> {
    let page = page_number(&query.page);
    let category = query.category.as_deref();
    let listing = state
        .blog_service
        .public_listing(page, category)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Error loading blog: {}", e);
            BlogListing::empty(page, category)
        });

    let mut context = TeraContext::new();
    context.insert("posts", &listing.posts);
    context.insert("categories", &listing.categories);
    context.insert("featured_post", &listing.featured_post);
    context.insert("current_category", &listing.current_category);

    render_page(&state, &session, "public/blog.html", &context, "/blog").await
}

pub async fn blog_detail(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
) -> Result<Html<String>, WebError> {
    let detail = match state.blog_service.published_detail(&slug).await {
        Ok(detail) => detail,
        Err(BlogServiceError::NotFound(_)) => return Err(WebError::NotFound),
        Err(e) => {
            tracing::error!("Error loading blog post {}: {}", slug, e);
            return Err(WebError::NotFound);
        }
    };

    let mut context = TeraContext::new();
    context.insert("post", &detail.post);
    context.insert("tags", &detail.post.tag_list());
    context.insert("content_html", &detail.content_html);
    context.insert("related_posts", &detail.related_posts);

    render_page(&state, &session, "public/blog_detail.html", &context, "/blog").await
}

pub async fn testimonials(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, WebError> {
    let page = state
        .content_service
        .testimonials_page()
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Error loading testimonials: {}", e);
            TestimonialsPage::default()
        });

    let mut context = TeraContext::new();
    context.insert("testimonials", &page.testimonials);
    context.insert("featured", &page.featured);
    context.insert("stats", &page.stats);

    render_page(
        &state,
        &session,
        "public/testimonial.html",
        &context,
        "/testimonials",
    )
    .await
}

pub async fn contact(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, WebError> {
    render_page(
        &state,
        &session,
        "public/contact.html",
        &TeraContext::new(),
        "/contact",
    )
    .await
}
