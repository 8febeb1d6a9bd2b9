//! Home page feature management
//!
//! - GET /admin/features
//! - GET/POST /admin/features/new
//! - GET/POST /admin/features/edit/{id}
//! - POST /admin/features/delete/{id}

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use tera::Context as TeraContext;

use crate::models::Feature;
use crate::services::ContentServiceError;
use crate::web::admin::{flash_error, parse_id};
use crate::web::forms::FeatureForm;
use crate::web::middleware::{AppState, WebError};
use crate::web::responses::{flash_redirect, render_page};
use crate::web::session::Session;

const LIST_PATH: &str = "/admin/features";

pub async fn list(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, WebError> {
    let features = state.content_service.list_features().await?;

    let mut context = TeraContext::new();
    context.insert("features", &features);
    Ok(render_page(
        &state,
        &session,
        "admin/manage_features.html",
        &context,
        LIST_PATH,
    )
    .await?
    .into_response())
}

async fn render_form(
    state: &AppState,
    session: &Session,
    feature: Option<&Feature>,
) -> Result<Response, WebError> {
    let mut context = TeraContext::new();
    context.insert("feature", &feature);
    Ok(render_page(
        state,
        session,
        "admin/edit_feature.html",
        &context,
        LIST_PATH,
    )
    .await?
    .into_response())
}

pub async fn new_form(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, WebError> {
    render_form(&state, &session, None).await
}

pub async fn edit_form(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response, WebError> {
    let feature = state.content_service.get_feature(parse_id(&id)?).await?;
    render_form(&state, &session, Some(&feature)).await
}

pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<FeatureForm>,
) -> Result<Response, WebError> {
    save(state, session, None, form).await
}

pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<FeatureForm>,
) -> Result<Response, WebError> {
    let id = parse_id(&id)?;
    save(state, session, Some(id), form).await
}

async fn save(
    state: AppState,
    session: Session,
    id: Option<i64>,
    form: FeatureForm,
) -> Result<Response, WebError> {
    let input = form.into_input();

    match state.content_service.save_feature(id, &input).await {
        Ok(_) => Ok(flash_redirect(
            &session,
            "success",
            "Feature saved successfully!",
            LIST_PATH,
        )),
        Err(ContentServiceError::NotFound(_)) => Err(WebError::NotFound),
        Err(e) => {
            flash_error(&session, "saving feature", &e);
            let mut feature = Feature::new(String::new());
            feature.id = id.unwrap_or_default();
            input.apply_to(&mut feature);
            render_form(&state, &session, Some(&feature)).await
        }
    }
}

pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response, WebError> {
    let id = parse_id(&id)?;

    match state.content_service.delete_feature(id).await {
        Ok(()) => Ok(flash_redirect(
            &session,
            "success",
            "Feature deleted successfully!",
            LIST_PATH,
        )),
        Err(ContentServiceError::NotFound(_)) => Err(WebError::NotFound),
        Err(e) => {
            flash_error(&session, "deleting feature", &e);
            Ok(Redirect::to(LIST_PATH).into_response())
        }
    }
}
