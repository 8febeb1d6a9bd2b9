//! GET/POST /admin/settings - the ten site settings

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Form,
};
use std::collections::HashMap;
use tera::Context as TeraContext;

use crate::services::settings::{keys, SiteSettings};
use crate::web::admin::flash_error;
use crate::web::forms::optional_text;
use crate::web::middleware::{AppState, WebError};
use crate::web::responses::{flash_redirect, render_page};
use crate::web::session::Session;

const SETTINGS_PATH: &str = "/admin/settings";

async fn render_form(
    state: &AppState,
    session: &Session,
    settings: &SiteSettings,
) -> Result<Response, WebError> {
    let mut context = TeraContext::new();
    context.insert("settings", settings);
    context.insert("setting_keys", &keys::ALL);
    Ok(render_page(state, session, "admin/settings.html", &context, SETTINGS_PATH)
        .await?
        .into_response())
}

pub async fn edit(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, WebError> {
    let settings = state.settings_service.admin_form().await?;
    render_form(&state, &session, &settings).await
}

pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response, WebError> {
    let values: Vec<(String, Option<String>)> = keys::ALL
        .iter()
        .map(|key| (key.to_string(), optional_text(&form.get(*key).cloned())))
        .collect();

    match state.settings_service.update_many(&values).await {
        Ok(()) => Ok(flash_redirect(
            &session,
            "success",
            "Settings updated successfully!",
            SETTINGS_PATH,
        )),
        Err(e) => {
            flash_error(&session, "updating settings", &e);
            render_form(&state, &session, &SiteSettings::from_values(&values)).await
        }
    }
}
