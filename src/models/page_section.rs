//! Page section model
//!
//! Editable blocks of the public pages, addressed by `(page, section_name)`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Page and section names used by the public templates
pub mod names {
    pub const HOME: &str = "home";
    pub const ABOUT: &str = "about";

    pub const HERO: &str = "hero";
    pub const ABOUT_CARD: &str = "about_card";
    pub const STORY: &str = "story";
    pub const MISSION: &str = "mission";
    pub const VISION: &str = "vision";
    pub const VALUE: &str = "value";
}

/// A content block on a public page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageSection {
    pub id: i64,
    /// Owning page (`home`, `about`, ...)
    pub page: String,
    /// Section within the page (`hero`, `story`, ...)
    pub section_name: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub button_text: Option<String>,
    pub button_link: Option<String>,
    pub order_index: i64,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

impl PageSection {
    /// Empty, active section for the given page slot.
    pub fn new(page: impl Into<String>, section_name: impl Into<String>) -> Self {
        Self {
            id: 0,
            page: page.into(),
            section_name: section_name.into(),
            title: None,
            content: None,
            image_url: None,
            video_url: None,
            button_text: None,
            button_link: None,
            order_index: 0,
            is_active: true,
            updated_at: Utc::now(),
        }
    }

    /// Whether the section has been stored yet
    pub fn is_new(&self) -> bool {
        self.id == 0
    }
}
