//! Web middleware
//!
//! Contains:
//! - Shared application state
//! - `WebError`, rendered as the 404/403/500 pages
//! - The admin login gate

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use tera::Context as TeraContext;

use crate::cache::create_cache;
use crate::config::{Config, UploadConfig};
use crate::db::repositories::{
    SqlxBlogCategoryRepository, SqlxBlogPostRepository, SqlxFeatureRepository,
    SqlxPageSectionRepository, SqlxSettingsRepository, SqlxStatisticRepository,
    SqlxTeamMemberRepository, SqlxTestimonialRepository, SqlxUserRepository,
};
use crate::services::{
    BlogService, BlogServiceError, ContentService, ContentServiceError, SettingsService,
    SettingsServiceError, UserService, UserServiceError,
};
use crate::theme::{simple_error_page, StandardTemplateVars, ThemeEngine};
use crate::web::session::{Session, SessionManager};

pub const LOGIN_PATH: &str = "/admin/login";

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub user_service: Arc<UserService>,
    pub blog_service: Arc<BlogService>,
    pub content_service: Arc<ContentService>,
    pub settings_service: Arc<SettingsService>,
    pub theme_engine: Arc<ThemeEngine>,
    pub sessions: Arc<SessionManager>,
    pub upload_config: Arc<UploadConfig>,
    pub static_dir: PathBuf,
}

impl AppState {
    /// Wire repositories, services, templates and the session signer
    pub fn build(pool: SqlitePool, config: &Config) -> Result<Self> {
        let cache = create_cache(&config.cache);
        let theme_engine = ThemeEngine::new(config.templates.path.as_deref())?;
        let sessions = SessionManager::from_config(&config.session)?;

        Ok(Self {
            user_service: Arc::new(UserService::new(SqlxUserRepository::boxed(pool.clone()))),
            blog_service: Arc::new(BlogService::new(
                SqlxBlogPostRepository::boxed(pool.clone()),
                SqlxBlogCategoryRepository::boxed(pool.clone()),
            )),
            content_service: Arc::new(ContentService::new(
                SqlxPageSectionRepository::boxed(pool.clone()),
                SqlxFeatureRepository::boxed(pool.clone()),
                SqlxStatisticRepository::boxed(pool.clone()),
                SqlxTestimonialRepository::boxed(pool.clone()),
                SqlxTeamMemberRepository::boxed(pool.clone()),
            )),
            settings_service: Arc::new(SettingsService::new(
                SqlxSettingsRepository::boxed(pool.clone()),
                cache,
            )),
            theme_engine: Arc::new(theme_engine),
            sessions: Arc::new(sessions),
            upload_config: Arc::new(config.upload.clone()),
            static_dir: config.server.static_dir.clone(),
            pool,
        })
    }
}

/// Handler errors that end in an error page
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("Not found")]
    NotFound,

    #[error("Forbidden")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Marks a response whose body the error page layer should fill in
#[derive(Debug, Clone, Copy)]
struct ErrorPage;

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::NotFound => StatusCode::NOT_FOUND,
            WebError::Forbidden => StatusCode::FORBIDDEN,
            WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        if let WebError::Internal(ref message) = self {
            tracing::error!("{}", message);
        }
        let mut response = self.status().into_response();
        response.extensions_mut().insert(ErrorPage);
        response
    }
}

impl From<BlogServiceError> for WebError {
    fn from(e: BlogServiceError) -> Self {
        match e {
            BlogServiceError::NotFound(_) => WebError::NotFound,
            other => WebError::Internal(other.to_string()),
        }
    }
}

impl From<ContentServiceError> for WebError {
    fn from(e: ContentServiceError) -> Self {
        match e {
            ContentServiceError::NotFound(_) => WebError::NotFound,
            other => WebError::Internal(other.to_string()),
        }
    }
}

impl From<SettingsServiceError> for WebError {
    fn from(e: SettingsServiceError) -> Self {
        WebError::Internal(e.to_string())
    }
}

impl From<UserServiceError> for WebError {
    fn from(e: UserServiceError) -> Self {
        WebError::Internal(e.to_string())
    }
}

impl From<anyhow::Error> for WebError {
    fn from(e: anyhow::Error) -> Self {
        WebError::Internal(format!("{:#}", e))
    }
}

/// Replace the empty body of a `WebError` response with the matching page
pub async fn error_pages(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if response.extensions().get::<ErrorPage>().is_none() {
        return response;
    }

    let status = response.status();
    let (template, title, message) = match status {
        StatusCode::NOT_FOUND => (
            "public/404.html",
            "Page Not Found",
            "The page you are looking for does not exist.",
        ),
        StatusCode::FORBIDDEN => (
            "public/404.html",
            "Forbidden",
            "You do not have access to this page.",
        ),
        _ => (
            "public/500.html",
            "Server Error",
            "Something went wrong on our side.",
        ),
    };

    let vars = StandardTemplateVars {
        settings: state.settings_service.site_context().await.ok(),
        ..Default::default()
    };
    let mut context = TeraContext::new();
    context.insert("status", &status.as_u16());
    context.insert("title", title);
    context.insert("message", message);

    let body = state
        .theme_engine
        .render_with_standard_vars(template, &context, &vars)
        .unwrap_or_else(|e| {
            tracing::error!("Failed to render error page: {:#}", e);
            simple_error_page(status.as_u16(), title, message)
        });

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    Response::from_parts(parts, Body::from(body))
}

/// Fallback for unmatched routes
pub async fn not_found() -> WebError {
    WebError::NotFound
}

/// Admin gate: without a valid login, flash a warning and go to the login page
pub async fn require_login(
    State(state): State<AppState>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    if let Some(user_id) = session.user_id() {
        match state.user_service.get_by_id(user_id).await {
            Ok(Some(_)) => return next.run(request).await,
            Ok(None) => session.clear(),
            Err(e) => return WebError::from(e).into_response(),
        }
    }

    session.flash("warning", "Please login to access admin panel.");
    Redirect::to(LOGIN_PATH).into_response()
}
