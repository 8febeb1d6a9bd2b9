//! Theme engine
//!
//! Template rendering using Tera.
//! - Default templates are embedded in the binary from `templates/`
//! - An optional directory overrides embedded templates with the same name
//! - Standard variables (site settings, flash messages, login state) are
//!   injected into every page

use anyhow::{Context, Result};
use chrono::Datelike;
use rust_embed::RustEmbed;
use serde::Serialize;
use std::error::Error as StdError;
use std::fs;
use std::path::Path;
use tera::{Context as TeraContext, Tera};

use crate::services::settings::SiteSettings;

mod error;
pub mod filters;

pub use error::ThemeError;

/// Templates compiled into the binary
#[derive(RustEmbed)]
#[folder = "templates/"]
#[include = "*.html"]
struct EmbeddedTemplates;

/// A one-shot message shown on the next rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct FlashMessage {
    /// Bootstrap alert class: success, info, warning, danger
    pub category: String,
    pub message: String,
}

impl FlashMessage {
    pub fn new(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            message: message.into(),
        }
    }
}

/// Variables every page template can rely on
#[derive(Debug, Clone, Default)]
pub struct StandardTemplateVars {
    pub settings: Option<SiteSettings>,
    pub messages: Vec<FlashMessage>,
    pub current_username: Option<String>,
    pub request_path: String,
}

/// Theme engine for rendering templates
pub struct ThemeEngine {
    tera: Tera,
}

impl ThemeEngine {
    /// Load the embedded templates, then any `.html` files under
    /// `override_dir` on top of them.
    pub fn new(override_dir: Option<&Path>) -> Result<Self> {
        let mut templates = embedded_templates()?;

        if let Some(dir) = override_dir {
            if dir.exists() {
                let mut overrides = Vec::new();
                collect_templates_from_dir(dir, dir, &mut overrides)?;
                tracing::info!(
                    "Loaded {} template override(s) from {:?}",
                    overrides.len(),
                    dir
                );
                for (name, content) in overrides {
                    templates.retain(|(existing, _)| existing != &name);
                    templates.push((name, content));
                }
            } else {
                tracing::warn!("Template override directory {:?} does not exist", dir);
            }
        }

        let mut tera = Tera::default();
        tera.add_raw_templates(templates)
            .map_err(|e| ThemeError::TemplateError(error_chain(&e)))?;
        filters::register(&mut tera);

        Ok(Self { tera })
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Render a template with context
    pub fn render(&self, template: &str, context: &TeraContext) -> Result<String> {
        self.tera.render(template, context).map_err(|e| {
            ThemeError::TemplateError(format!(
                "Failed to render '{}': {}",
                template,
                error_chain(&e)
            ))
            .into()
        })
    }

    /// Render a template with standard variables automatically added
    pub fn render_with_standard_vars(
        &self,
        template: &str,
        context: &TeraContext,
        standard_vars: &StandardTemplateVars,
    ) -> Result<String> {
        let mut full_context = context.clone();

        let settings = standard_vars
            .settings
            .clone()
            .unwrap_or_else(SiteSettings::blank);
        full_context.insert("site_title", &settings.site_title);
        full_context.insert("site_tagline", &settings.site_tagline);
        full_context.insert("contact_email", &settings.contact_email);
        full_context.insert("contact_phone", &settings.contact_phone);
        full_context.insert("contact_address", &settings.contact_address);
        full_context.insert("facebook_url", &settings.facebook_url);
        full_context.insert("twitter_url", &settings.twitter_url);
        full_context.insert("linkedin_url", &settings.linkedin_url);
        full_context.insert("instagram_url", &settings.instagram_url);
        full_context.insert("github_url", &settings.github_url);

        full_context.insert("messages", &standard_vars.messages);
        full_context.insert("logged_in", &standard_vars.current_username.is_some());
        full_context.insert("current_username", &standard_vars.current_username);
        full_context.insert("request_path", &standard_vars.request_path);
        full_context.insert("year", &chrono::Utc::now().year());

        self.render(template, &full_context)
    }
}

fn embedded_templates() -> Result<Vec<(String, String)>> {
    let mut templates = Vec::new();
    for name in EmbeddedTemplates::iter() {
        let Some(file) = EmbeddedTemplates::get(&name) else {
            continue;
        };
        let content = String::from_utf8(file.data.into_owned())
            .with_context(|| format!("Template {} is not valid UTF-8", name))?;
        templates.push((name.to_string(), content));
    }
    Ok(templates)
}

/// Collect `.html` files below `current_path`, named relative to `base_path`
fn collect_templates_from_dir(
    base_path: &Path,
    current_path: &Path,
    templates: &mut Vec<(String, String)>,
) -> Result<()> {
    for entry in fs::read_dir(current_path)
        .with_context(|| format!("Failed to read template directory: {:?}", current_path))?
    {
        let path = entry?.path();

        if path.is_dir() {
            collect_templates_from_dir(base_path, &path, templates)?;
        } else if path.extension().map_or(false, |ext| ext == "html") {
            let relative_path = path.strip_prefix(base_path).map_err(|_| {
                ThemeError::TemplateError("Failed to get relative path".to_string())
            })?;

            let template_name = relative_path.to_string_lossy().replace('\\', "/");
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read template: {:?}", path))?;

            templates.push((template_name, content));
        }
    }

    Ok(())
}

fn error_chain(e: &tera::Error) -> String {
    let mut error_msg = e.to_string();
    let mut source = e.source();
    while let Some(s) = source {
        error_msg.push_str(&format!("\n  Caused by: {}", s));
        source = s.source();
    }
    error_msg
}

/// Bare HTML page used when the error templates themselves fail
pub fn simple_error_page(status: u16, title: &str, message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{status} {title}</title></head>
<body>
<h1>{status} {title}</h1>
<p>{message}</p>
<p><a href="/">Back to home</a></p>
</body>
</html>"#,
        status = status,
        title = html_escape(title),
        message = html_escape(message),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
