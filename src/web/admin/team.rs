//! Team member management
//!
//! - GET /admin/team
//! - GET/POST /admin/team/new
//! - GET/POST /admin/team/edit/{id}
//! - POST /admin/team/delete/{id}

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use tera::Context as TeraContext;

use crate::models::TeamMember;
use crate::services::ContentServiceError;
use crate::web::admin::{flash_error, parse_id};
use crate::web::forms::TeamMemberForm;
use crate::web::middleware::{AppState, WebError};
use crate::web::responses::{flash_redirect, render_page};
use crate::web::session::Session;

const LIST_PATH: &str = "/admin/team";

pub async fn list(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, WebError> {
    let team_members = state
        .content_service
        .list_team()
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Error loading team members: {}", e);
            session.flash("danger", "Error loading team members");
            Vec::new()
        });

    let mut context = TeraContext::new();
    context.insert("team_members", &team_members);
    Ok(render_page(
        &state,
        &session,
        "admin/manage_team.html",
        &context,
        LIST_PATH,
    )
    .await?
    .into_response())
}

async fn render_form(
    state: &AppState,
    session: &Session,
    member: Option<&TeamMember>,
) -> Result<Response, WebError> {
    let mut context = TeraContext::new();
    context.insert("member", &member);
    Ok(render_page(
        state,
        session,
        "admin/edit_team.html",
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
    let member = state.content_service.get_team_member(parse_id(&id)?).await?;
    render_form(&state, &session, Some(&member)).await
}

pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<TeamMemberForm>,
) -> Result<Response, WebError> {
    save(state, session, None, form).await
}

pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<TeamMemberForm>,
) -> Result<Response, WebError> {
    let id = parse_id(&id)?;
    save(state, session, Some(id), form).await
}

async fn save(
    state: AppState,
    session: Session,
    id: Option<i64>,
    form: TeamMemberForm,
) -> Result<Response, WebError> {
    let input = form.into_input();

    match state.content_service.save_team_member(id, &input).await {
        Ok(_) => Ok(flash_redirect(
            &session,
            "success",
            "Team member saved successfully!",
            LIST_PATH,
        )),
        Err(ContentServiceError::NotFound(_)) => Err(WebError::NotFound),
        Err(e) => {
            flash_error(&session, "saving team member", &e);
            let mut member = TeamMember::new(String::new(), String::new());
            member.id = id.unwrap_or_default();
            input.apply_to(&mut member);
            render_form(&state, &session, Some(&member)).await
        }
    }
}

pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response, WebError> {
    let id = parse_id(&id)?;

    match state.content_service.delete_team_member(id).await {
        Ok(()) => Ok(flash_redirect(
            &session,
            "success",
            "Team member deleted successfully!",
            LIST_PATH,
        )),
        Err(ContentServiceError::NotFound(_)) => Err(WebError::NotFound),
        Err(e) => {
            flash_error(&session, "deleting team member", &e);
            Ok(Redirect::to(LIST_PATH).into_response())
        }
    }
}
