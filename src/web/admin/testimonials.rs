//! Testimonial management
//!
//! - GET /admin/testimonials
//! - GET/POST /admin/testimonials/new
//! - GET/POST /admin/testimonials/edit/{id}
//! - POST /admin/testimonials/delete/{id}

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use tera::Context as TeraContext;

use crate::models::Testimonial;
use crate::services::ContentServiceError;
use crate::web::admin::{flash_error, parse_id};
use crate::web::forms::TestimonialForm;
use crate::web::middleware::{AppState, WebError};
use crate::web::responses::{flash_redirect, render_page};
use crate::web::session::Session;

const LIST_PATH: &str = "/admin/testimonials";

pub async fn list(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, WebError> {
    let testimonials = state
        .content_service
        .list_testimonials()
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Error loading testimonials: {}", e);
            session.flash("danger", "Error loading testimonials");
            Vec::new()
        });

    let mut context = TeraContext::new();
    context.insert("testimonials", &testimonials);
    Ok(render_page(
        &state,
        &session,
        "admin/manage_testimonials.html",
        &context,
        LIST_PATH,
    )
    .await?
    .into_response())
}

async fn render_form(
    state: &AppState,
    session: &Session,
    testimonial: Option<&Testimonial>,
) -> Result<Response, WebError> {
    let mut context = TeraContext::new();
    context.insert("testimonial", &testimonial);
    Ok(render_page(
        state,
        session,
        "admin/edit_testimonial.html",
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
    let testimonial = state.content_service.get_testimonial(parse_id(&id)?).await?;
    render_form(&state, &session, Some(&testimonial)).await
}

pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<TestimonialForm>,
) -> Result<Response, WebError> {
    save(state, session, None, form).await
}

pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<TestimonialForm>,
) -> Result<Response, WebError> {
    let id = parse_id(&id)?;
    save(state, session, Some(id), form).await
}

async fn save(
    state: AppState,
    session: Session,
    id: Option<i64>,
    form: TestimonialForm,
) -> Result<Response, WebError> {
    let input = form.into_input();

    match state.content_service.save_testimonial(id, &input).await {
        Ok(_) => Ok(flash_redirect(
            &session,
            "success",
            "Testimonial saved successfully!",
            LIST_PATH,
        )),
        Err(ContentServiceError::NotFound(_)) => Err(WebError::NotFound),
        Err(e) => {
            flash_error(&session, "saving testimonial", &e);
            let mut testimonial = Testimonial::new(String::new(), String::new());
            testimonial.id = id.unwrap_or_default();
            input.apply_to(&mut testimonial);
            render_form(&state, &session, Some(&testimonial)).await
        }
    }
}

pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response, WebError> {
    let id = parse_id(&id)?;

    match state.content_service.delete_testimonial(id).await {
        Ok(()) => Ok(flash_redirect(
            &session,
            "success",
            "Testimonial deleted successfully!",
            LIST_PATH,
        )),
        Err(ContentServiceError::NotFound(_)) => Err(WebError::NotFound),
        Err(e) => {
            flash_error(&session, "deleting testimonial", &e);
            Ok(Redirect::to(LIST_PATH).into_response())
        }
    }
}
