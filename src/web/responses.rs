//! Page rendering helpers shared by the public and admin handlers

use axum::response::{Html, IntoResponse, Redirect, Response};
use tera::Context as TeraContext;

use crate::theme::StandardTemplateVars;
use crate::web::middleware::{AppState, WebError};
use crate::web::session::Session;

/// Render `template` with the site settings, pending flashes and login
/// state added to `context`.
///
/// A settings lookup failure is logged and the page renders with blank
/// settings.
pub async fn render_page(
    state: &AppState,
    session: &Session,
    template: &str,
    context: &TeraContext,
    request_path: &str,
) -> Result<Html<String>, WebError> {
    let settings = match state.settings_service.site_context().await {
        Ok(settings) => Some(settings),
        Err(e) => {
            tracing::error!("Failed to load site settings: {}", e);
            None
        }
    };

    let vars = StandardTemplateVars {
        settings,
        messages: session.take_flashes(),
        current_username: session.username(),
        request_path: request_path.to_string(),
    };

    let html = state
        .theme_engine
        .render_with_standard_vars(template, context, &vars)?;
    Ok(Html(html))
}

/// Flash `message` and redirect (303) to `to`
pub fn flash_redirect(
    session: &Session,
    category: &str,
    message: impl Into<String>,
    to: &str,
) -> Response {
    session.flash(category, message);
    Redirect::to(to).into_response()
}
