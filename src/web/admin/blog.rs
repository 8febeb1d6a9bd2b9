//! Blog post management
//!
//! - GET /admin/blog?page=N
//! - GET/POST /admin/blog/new
//! - GET/POST /admin/blog/edit/{id}
//! - POST /admin/blog/delete/{id}

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tera::Context as TeraContext;

use crate::models::{BlogPost, ListParams, PagedResult};
use crate::services::blog::ADMIN_PER_PAGE;
use crate::services::BlogServiceError;
use crate::web::admin::{flash_error, parse_id};
use crate::web::forms::PostForm;
use crate::web::middleware::{AppState, WebError};
use crate::web::public::page_number;
use crate::web::responses::{flash_redirect, render_page};
use crate::web::session::Session;

const LIST_PATH: &str = "/admin/blog";

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PageQuery>,
) -> Result<Response, WebError> {
    let page = page_number(&query.page);

    let (posts, categories) = match state.blog_service.admin_listing(page).await {
        Ok(listing) => listing,
        Err(e) => {
            tracing::error!("Error loading blog posts: {}", e);
            session.flash("danger", "Error loading blog posts");
            let params = ListParams::new(page, ADMIN_PER_PAGE);
            (PagedResult::new(Vec::new(), 0, &params), Vec::new())
        }
    };

    let mut context = TeraContext::new();
    context.insert("posts", &posts);
    context.insert("categories", &categories);
    Ok(render_page(&state, &session, "admin/manage_blog.html", &context, LIST_PATH)
        .await?
        .into_response())
}

async fn render_form(
    state: &AppState,
    session: &Session,
    post: Option<&BlogPost>,
) -> Result<Response, WebError> {
    let categories = state.blog_service.list_categories().await?;

    let mut context = TeraContext::new();
    context.insert("post", &post);
    context.insert("categories", &categories);
    Ok(render_page(state, session, "admin/edit_blog.html", &context, LIST_PATH)
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
    let post = state.blog_service.get_post(parse_id(&id)?).await?;
    render_form(&state, &session, Some(&post)).await
}

pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PostForm>,
) -> Result<Response, WebError> {
    save(state, session, None, form).await
}

pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<PostForm>,
) -> Result<Response, WebError> {
    let id = parse_id(&id)?;
    save(state, session, Some(id), form).await
}

async fn save(
    state: AppState,
    session: Session,
    id: Option<i64>,
    form: PostForm,
) -> Result<Response, WebError> {
    let input = form.into_input();

    match state.blog_service.save_post(id, &input).await {
        Ok(_) => Ok(flash_redirect(
            &session,
            "success",
            "Blog post saved successfully!",
            LIST_PATH,
        )),
        Err(BlogServiceError::NotFound(_)) => Err(WebError::NotFound),
        Err(e) => {
            flash_error(&session, "saving blog post", &e);
            let mut post = match id {
                Some(id) => state.blog_service.get_post(id).await?,
                None => BlogPost::new(String::new(), String::new(), String::new()),
            };
            input.apply_to(&mut post);
            render_form(&state, &session, Some(&post)).await
        }
    }
}

pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response, WebError> {
    let id = parse_id(&id)?;

    match state.blog_service.delete_post(id).await {
        Ok(()) => Ok(flash_redirect(
            &session,
            "success",
            "Blog post deleted successfully!",
            LIST_PATH,
        )),
        Err(BlogServiceError::NotFound(_)) => Err(WebError::NotFound),
        Err(e) => {
            flash_error(&session, "deleting blog post", &e);
            Ok(Redirect::to(LIST_PATH).into_response())
        }
    }
}
