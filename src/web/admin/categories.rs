//! Blog category management
//!
//! - GET /admin/categories
//! - GET/POST /admin/categories/new
//! - GET/POST /admin/categories/edit/{id}
//! - POST /admin/categories/delete/{id}

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use tera::Context as TeraContext;

use crate::models::BlogCategory;
use crate::services::BlogServiceError;
use crate::web::admin::{flash_error, parse_id};
use crate::web::forms::CategoryForm;
use crate::web::middleware::{AppState, WebError};
use crate::web::responses::{flash_redirect, render_page};
use crate::web::session::Session;

const LIST_PATH: &str = "/admin/categories";

pub async fn list(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, WebError> {
    let categories = state.blog_service.list_categories().await?;

    let mut context = TeraContext::new();
    context.insert("categories", &categories);
    Ok(render_page(
        &state,
        &session,
        "admin/manage_categories.html",
        &context,
        LIST_PATH,
    )
    .await?
    .into_response())
}

async fn render_form(
    state: &AppState,
    session: &Session,
    category: Option<&BlogCategory>,
) -> Result<Response, WebError> {
    let mut context = TeraContext::new();
    context.insert("category", &category);
    Ok(render_page(state, session, "admin/edit_category.html", &context, LIST_PATH)
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
    let category = state.blog_service.get_category(parse_id(&id)?).await?;
    render_form(&state, &session, Some(&category)).await
}

pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CategoryForm>,
) -> Result<Response, WebError> {
    save(state, session, None, form).await
}

pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<CategoryForm>,
) -> Result<Response, WebError> {
    let id = parse_id(&id)?;
    save(state, session, Some(id), form).await
}

async fn save(
    state: AppState,
    session: Session,
    id: Option<i64>,
    form: CategoryForm,
) -> Result<Response, WebError> {
    let input = form.into_input();

    match state.blog_service.save_category(id, &input).await {
        Ok(_) => Ok(flash_redirect(
            &session,
            "success",
            "Category saved successfully!",
            LIST_PATH,
        )),
        Err(BlogServiceError::NotFound(_)) => Err(WebError::NotFound),
        Err(e) => {
            flash_error(&session, "saving category", &e);
            let mut category = BlogCategory::new(String::new(), String::new(), None);
            category.id = id.unwrap_or_default();
            input.apply_to(&mut category);
            render_form(&state, &session, Some(&category)).await
        }
    }
}

pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response, WebError> {
    let id = parse_id(&id)?;

    match state.blog_service.delete_category(id).await {
        Ok(()) => Ok(flash_redirect(
            &session,
            "success",
            "Category deleted successfully!",
            LIST_PATH,
        )),
        Err(BlogServiceError::NotFound(_)) => Err(WebError::NotFound),
        Err(e) => {
            flash_error(&session, "deleting category", &e);
            Ok(Redirect::to(LIST_PATH).into_response())
        }
    }
}
