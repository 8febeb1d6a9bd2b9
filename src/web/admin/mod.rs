//! Admin panel
//!
//! Every route except the login form sits behind `require_login`.

pub mod auth;
pub mod blog;
pub mod categories;
pub mod dashboard;
pub mod features;
pub mod pages;
pub mod settings;
pub mod stats;
pub mod team;
pub mod testimonials;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};

use crate::web::middleware::{self, AppState, WebError};
use crate::web::session::Session;

/// Build the admin router
pub fn router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/admin", get(dashboard::dashboard))
        .route("/admin/dashboard", get(dashboard::dashboard))
        .route("/admin/logout", get(auth::logout))
        .route("/admin/home", get(pages::edit_home).post(pages::update_home))
        .route("/admin/about", get(pages::edit_about).post(pages::update_about))
        // Blog
        .route("/admin/blog", get(blog::list))
        .route("/admin/blog/new", get(blog::new_form).post(blog::create))
        .route("/admin/blog/edit/{id}", get(blog::edit_form).post(blog::update))
        .route("/admin/blog/delete/{id}", post(blog::delete))
        .route("/admin/categories", get(categories::list))
        .route(
            "/admin/categories/new",
            get(categories::new_form).post(categories::create),
        )
        .route(
            "/admin/categories/edit/{id}",
            get(categories::edit_form).post(categories::update),
        )
        .route("/admin/categories/delete/{id}", post(categories::delete))
        // Testimonials
        .route("/admin/testimonials", get(testimonials::list))
        .route(
            "/admin/testimonials/new",
            get(testimonials::new_form).post(testimonials::create),
        )
        .route(
            "/admin/testimonials/edit/{id}",
            get(testimonials::edit_form).post(testimonials::update),
        )
        .route("/admin/testimonials/delete/{id}", post(testimonials::delete))
        // Team
        .route("/admin/team", get(team::list))
        .route("/admin/team/new", get(team::new_form).post(team::create))
        .route("/admin/team/edit/{id}", get(team::edit_form).post(team::update))
        .route("/admin/team/delete/{id}", post(team::delete))
        // Statistics and features
        .route("/admin/stats", get(stats::list).post(stats::save))
        .route("/admin/stats/delete/{id}", post(stats::delete))
        .route("/admin/features", get(features::list))
        .route(
            "/admin/features/new",
            get(features::new_form).post(features::create),
        )
        .route(
            "/admin/features/edit/{id}",
            get(features::edit_form).post(features::update),
        )
        .route("/admin/features/delete/{id}", post(features::delete))
        .route(
            "/admin/settings",
            get(settings::edit).post(settings::update),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::require_login,
        ));

    Router::new()
        .route(
            middleware::LOGIN_PATH,
            get(auth::login_form).post(auth::login),
        )
        .merge(protected)
}

/// Numeric path id; anything else is a missing page
pub(crate) fn parse_id(raw: &str) -> Result<i64, WebError> {
    raw.parse().map_err(|_| WebError::NotFound)
}

/// Flash a failed save the way every admin form reports it
pub(crate) fn flash_error(session: &Session, action: &str, message: impl std::fmt::Display) {
    tracing::error!("Error {}: {}", action, message);
    session.flash("danger", format!("Error: {}", message));
}

/// `about_card` -> `About_Card`, `story` -> `Story`
pub(crate) fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
