//! Testimonial model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default star rating
pub const DEFAULT_RATING: i64 = 5;

/// A customer testimonial with optional impact metrics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Testimonial {
    pub id: i64,
    pub name: String,
    pub location: Option<String>,
    /// e.g. "Wheat Farmer"
    pub role: Option<String>,
    pub avatar_url: Option<String>,
    pub testimonial: String,
    /// 1-5 stars
    pub rating: i64,
    pub yield_increase: Option<String>,
    pub water_saved: Option<String>,
    pub income_increase: Option<String>,
    pub video_url: Option<String>,
    pub is_featured: bool,
    pub is_active: bool,
    pub order_index: i64,
    pub created_at: DateTime<Utc>,
}

impl Testimonial {
    pub fn new(name: String, testimonial: String) -> Self {
        Self {
            id: 0,
            name,
            location: None,
            role: None,
            avatar_url: None,
            testimonial,
            rating: DEFAULT_RATING,
            yield_increase: None,
            water_saved: None,
            income_increase: None,
            video_url: None,
            is_featured: false,
            is_active: true,
            order_index: 0,
            created_at: Utc::now(),
        }
    }
}

/// Clamp a submitted rating into the 1..=5 star range
pub fn clamp_rating(rating: i64) -> i64 {
    rating.clamp(1, 5)
}
