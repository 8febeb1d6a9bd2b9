//! GET /admin, /admin/dashboard

use axum::{extract::State, response::Html};
use serde::Serialize;
use tera::Context as TeraContext;

use crate::models::{BlogPost, Testimonial};
use crate::web::middleware::{AppState, WebError};
use crate::web::responses::render_page;
use crate::web::session::Session;

#[derive(Debug, Default, Serialize)]
pub struct DashboardStats {
    pub total_posts: i64,
    pub published_posts: i64,
    pub total_testimonials: i64,
    pub team_members: i64,
}

async fn load(
    state: &AppState,
) -> Result<(DashboardStats, Vec<BlogPost>, Vec<Testimonial>), WebError> {
    let (total_posts, published_posts) = state.blog_service.post_counts().await?;
    let (total_testimonials, team_members) = state.content_service.dashboard_counts().await?;

    Ok((
        DashboardStats {
            total_posts,
            published_posts,
            total_testimonials,
            team_members,
        },
        state.blog_service.recent_posts().await?,
        state.content_service.recent_testimonials().await?,
    ))
}

pub async fn dashboard(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, WebError> {
    let (stats, recent_posts, recent_testimonials) = match load(&state).await {
        Ok(data) => data,
        Err(e) => {
            tracing::error!("Error loading dashboard: {}", e);
            session.flash("danger", "Error loading dashboard");
            Default::default()
        }
    };

    let mut context = TeraContext::new();
    context.insert("stats", &stats);
    context.insert("recent_posts", &recent_posts);
    context.insert("recent_testimonials", &recent_testimonials);

    render_page(&state, &session, "admin/dashboard.html", &context, "/admin/dashboard").await
}
