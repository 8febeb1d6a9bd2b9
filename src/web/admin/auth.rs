//! Admin login and logout
//!
//! - GET/POST /admin/login
//! - GET /admin/logout

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use tera::Context as TeraContext;

use crate::web::forms::{text, LoginForm};
use crate::web::middleware::{AppState, WebError, LOGIN_PATH};
use crate::web::responses::{flash_redirect, render_page};
use crate::web::session::Session;

const DASHBOARD_PATH: &str = "/admin/dashboard";

async fn render_login(
    state: &AppState,
    session: &Session,
    username: &str,
) -> Result<Response, WebError> {
    let mut context = TeraContext::new();
    context.insert("username", username);
    Ok(render_page(state, session, "admin/login.html", &context, LOGIN_PATH)
        .await?
        .into_response())
}

pub async fn login_form(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, WebError> {
    if session.is_logged_in() {
        return Ok(Redirect::to(DASHBOARD_PATH).into_response());
    }
    render_login(&state, &session, "").await
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, WebError> {
    if session.is_logged_in() {
        return Ok(Redirect::to(DASHBOARD_PATH).into_response());
    }

    let username = text(&form.username);
    let password = text(&form.password);

    match state
        .user_service
        .authenticate(username.trim(), &password)
        .await
    {
        Ok(Some(user)) => {
            tracing::info!("User {} logged in", user.username);
            session.login(&user);
            Ok(flash_redirect(
                &session,
                "success",
                "Login successful!",
                DASHBOARD_PATH,
            ))
        }
        Ok(None) => {
            tracing::warn!("Failed login attempt for '{}'", username);
            session.flash("danger", "Invalid username or password");
            render_login(&state, &session, &username).await
        }
        Err(e) => {
            tracing::error!("Login error: {}", e);
            session.flash("danger", "An error occurred during login");
            render_login(&state, &session, &username).await
        }
    }
}

pub async fn logout(session: Session) -> Response {
    if let Some(username) = session.username() {
        tracing::info!("User {} logged out", username);
    }
    session.clear();
    flash_redirect(&session, "info", "You have been logged out", LOGIN_PATH)
}
