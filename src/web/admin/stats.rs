//! Statistics management
//!
//! - GET /admin/stats - list with an inline form
//! - POST /admin/stats - create, or update when `stat_id` is present
//! - POST /admin/stats/delete/{id}

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use tera::Context as TeraContext;

use crate::models::Statistic;
use crate::services::{ContentServiceError, StatisticInput};
use crate::web::admin::{flash_error, parse_id};
use crate::web::forms::StatisticForm;
use crate::web::middleware::{AppState, WebError};
use crate::web::responses::{flash_redirect, render_page};
use crate::web::session::Session;

const LIST_PATH: &str = "/admin/stats";

pub async fn list(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, WebError> {
    let stats = state.content_service.list_stats().await?;
    render_list(&state, &session, &stats, None).await
}

pub async fn save(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<StatisticForm>,
) -> Result<Response, WebError> {
    let stat_id = form.stat_id();
    let input = form.into_input();

    match state.content_service.save_stat(stat_id, &input).await {
        Ok(_) => Ok(flash_redirect(
            &session,
            "success",
            "Statistic saved successfully!",
            LIST_PATH,
        )),
        Err(ContentServiceError::NotFound(_)) => Err(WebError::NotFound),
        Err(e) => {
            flash_error(&session, "saving statistic", &e);
            let mut stats = state.content_service.list_stats().await.unwrap_or_else(|e| {
                tracing::error!("Error loading statistics: {}", e);
                Vec::new()
            });

            // An update shows the submitted values in its own row
            let submitted = match stat_id.and_then(|id| stats.iter_mut().find(|s| s.id == id)) {
                Some(stat) => {
                    input.apply_to(stat);
                    None
                }
                None => Some(&input),
            };
            render_list(&state, &session, &stats, submitted).await
        }
    }
}

async fn render_list(
    state: &AppState,
    session: &Session,
    stats: &[Statistic],
    submitted: Option<&StatisticInput>,
) -> Result<Response, WebError> {
    let mut context = TeraContext::new();
    context.insert("stats", stats);
    context.insert("submitted", &submitted);
    Ok(render_page(state, session, "admin/manage_stats.html", &context, LIST_PATH)
        .await?
        .into_response())
}

pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response, WebError> {
    let id = parse_id(&id)?;

    match state.content_service.delete_stat(id).await {
        Ok(()) => Ok(flash_redirect(
            &session,
            "success",
            "Statistic deleted successfully!",
            LIST_PATH,
        )),
        Err(ContentServiceError::NotFound(_)) => Err(WebError::NotFound),
        Err(e) => {
            flash_error(&session, "deleting statistic", &e);
            Ok(Redirect::to(LIST_PATH).into_response())
        }
    }
}
