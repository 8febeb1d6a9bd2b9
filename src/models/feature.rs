//! Feature model

use serde::{Deserialize, Serialize};

/// A feature/service card on the home page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Icon class
    pub icon: Option<String>,
    pub image_url: Option<String>,
    pub order_index: i64,
    pub is_active: bool,
}

impl Feature {
    pub fn new(title: String) -> Self {
        Self {
            id: 0,
            title,
            description: None,
            icon: None,
            image_url: None,
            order_index: 0,
            is_active: true,
        }
    }
}
