//! Home and about page editors
//!
//! - GET/POST /admin/home - hero section
//! - GET/POST /admin/about - story, mission, vision and value sections

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Form,
};
use tera::Context as TeraContext;

use crate::models::page_section::names;
use crate::models::PageSection;
use crate::services::content::{AboutEditor, HomeEditor};
use crate::web::admin::{flash_error, title_case};
use crate::web::forms::{AboutSectionForm, HeroForm};
use crate::web::middleware::{AppState, WebError};
use crate::web::responses::{flash_redirect, render_page};
use crate::web::session::Session;

const HOME_PATH: &str = "/admin/home";
const ABOUT_PATH: &str = "/admin/about";

async fn render_home(
    state: &AppState,
    session: &Session,
    editor: &HomeEditor,
) -> Result<Response, WebError> {
    let mut context = TeraContext::new();
    context.insert("hero", &editor.hero);
    context.insert("about_cards", &editor.about_cards);
    context.insert("features", &editor.features);
    Ok(render_page(state, session, "admin/edit_home.html", &context, HOME_PATH)
        .await?
        .into_response())
}

pub async fn edit_home(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, WebError> {
    let editor = state.content_service.home_editor().await?;
    render_home(&state, &session, &editor).await
}

pub async fn update_home(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<HeroForm>,
) -> Result<Response, WebError> {
    let input = form.into_input();

    match state.content_service.update_hero(&input).await {
        Ok(_) => Ok(flash_redirect(
            &session,
            "success",
            "Home page updated successfully!",
            HOME_PATH,
        )),
        Err(e) => {
            flash_error(&session, "updating home page", &e);
            let mut editor = state.content_service.home_editor().await?;
            let mut hero = editor
                .hero
                .take()
                .unwrap_or_else(|| PageSection::new(names::HOME, names::HERO));
            input.apply_to(&mut hero);
            editor.hero = Some(hero);
            render_home(&state, &session, &editor).await
        }
    }
}

async fn render_about(
    state: &AppState,
    session: &Session,
    editor: &AboutEditor,
) -> Result<Response, WebError> {
    let mut context = TeraContext::new();
    context.insert("story", &editor.story);
    context.insert("mission", &editor.mission);
    context.insert("vision", &editor.vision);
    context.insert("values", &editor.values);
    Ok(render_page(state, session, "admin/edit_about.html", &context, ABOUT_PATH)
        .await?
        .into_response())
}

pub async fn edit_about(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, WebError> {
    let editor = state.content_service.about_editor().await?;
    render_about(&state, &session, &editor).await
}

pub async fn update_about(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AboutSectionForm>,
) -> Result<Response, WebError> {
    let section = form.section_name();

    match state
        .content_service
        .update_about_section(&section, &form.to_input())
        .await
    {
        Ok(_) => Ok(flash_redirect(
            &session,
            "success",
            format!("{} section updated successfully!", title_case(&section)),
            ABOUT_PATH,
        )),
        Err(e) => {
            flash_error(&session, "updating about section", &e);
            let editor = state.content_service.about_editor().await?;
            render_about(&state, &session, &editor).await
        }
    }
}
