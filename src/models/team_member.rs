//! Team member model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person shown on the About page.
///
/// Leadership members are listed in their own section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamMember {
    pub id: i64,
    pub name: String,
    pub position: String,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub email: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub order_index: i64,
    pub is_leadership: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl TeamMember {
    pub fn new(name: String, position: String) -> Self {
        Self {
            id: 0,
            name,
            position,
            bio: None,
            photo_url: None,
            email: None,
            linkedin: None,
            twitter: None,
            order_index: 0,
            is_leadership: false,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
