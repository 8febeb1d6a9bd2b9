//! Admin form payloads
//!
//! Every field arrives as an optional string and is coerced here:
//! checkboxes are on only for the value `on`, numbers fall back to their
//! default when missing or unparsable, and empty text becomes NULL.

use serde::Deserialize;

use crate::models::{DEFAULT_RATING, DEFAULT_READ_TIME};
use crate::services::{
    CategoryInput, FeatureInput, HeroInput, PostInput, SectionInput, StatisticInput,
    TeamMemberInput, TestimonialInput,
};

pub fn checkbox(value: &Option<String>) -> bool {
    value.as_deref() == Some("on")
}

pub fn int_or(value: &Option<String>, default: i64) -> i64 {
    parse_int(value).unwrap_or(default)
}

pub fn parse_int(value: &Option<String>) -> Option<i64> {
    value.as_deref().and_then(|v| v.trim().parse().ok())
}

/// `None` for a missing or blank field
pub fn optional_text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .map(String::from)
}

pub fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HeroForm {
    pub hero_title: Option<String>,
    pub hero_content: Option<String>,
    pub hero_image: Option<String>,
    pub hero_button_text: Option<String>,
    pub hero_button_link: Option<String>,
}

impl HeroForm {
    pub fn into_input(self) -> HeroInput {
        HeroInput {
            title: optional_text(&self.hero_title),
            content: optional_text(&self.hero_content),
            image_url: optional_text(&self.hero_image),
            button_text: optional_text(&self.hero_button_text),
            button_link: optional_text(&self.hero_button_link),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AboutSectionForm {
    pub section: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
}

impl AboutSectionForm {
    pub fn section_name(&self) -> String {
        text(&self.section).trim().to_string()
    }

    pub fn to_input(&self) -> SectionInput {
        SectionInput {
            title: optional_text(&self.title),
            content: optional_text(&self.content),
            image_url: optional_text(&self.image_url),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PostForm {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub featured_image: Option<String>,
    pub author: Option<String>,
    pub category_id: Option<String>,
    pub tags: Option<String>,
    pub meta_description: Option<String>,
    pub read_time: Option<String>,
    pub is_published: Option<String>,
    pub is_featured: Option<String>,
}

impl PostForm {
    pub fn into_input(self) -> PostInput {
        PostInput {
            title: text(&self.title),
            slug: optional_text(&self.slug),
            excerpt: optional_text(&self.excerpt),
            content: text(&self.content),
            featured_image: optional_text(&self.featured_image),
            author: optional_text(&self.author),
            category_id: parse_int(&self.category_id),
            tags: optional_text(&self.tags),
            meta_description: optional_text(&self.meta_description),
            read_time: Some(int_or(&self.read_time, DEFAULT_READ_TIME)),
            is_published: checkbox(&self.is_published),
            is_featured: checkbox(&self.is_featured),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryForm {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

impl CategoryForm {
    pub fn into_input(self) -> CategoryInput {
        CategoryInput {
            name: text(&self.name),
            slug: optional_text(&self.slug),
            description: optional_text(&self.description),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TestimonialForm {
    pub name: Option<String>,
    pub location: Option<String>,
    pub role: Option<String>,
    pub avatar_url: Option<String>,
    pub testimonial: Option<String>,
    pub rating: Option<String>,
    pub yield_increase: Option<String>,
    pub water_saved: Option<String>,
    pub income_increase: Option<String>,
    pub video_url: Option<String>,
    pub is_featured: Option<String>,
    pub is_active: Option<String>,
    pub order_index: Option<String>,
}

impl TestimonialForm {
    pub fn into_input(self) -> TestimonialInput {
        TestimonialInput {
            name: text(&self.name),
            location: optional_text(&self.location),
            role: optional_text(&self.role),
            avatar_url: optional_text(&self.avatar_url),
            testimonial: text(&self.testimonial),
            rating: Some(int_or(&self.rating, DEFAULT_RATING)),
            yield_increase: optional_text(&self.yield_increase),
            water_saved: optional_text(&self.water_saved),
            income_increase: optional_text(&self.income_increase),
            video_url: optional_text(&self.video_url),
            is_featured: checkbox(&self.is_featured),
            is_active: checkbox(&self.is_active),
            order_index: int_or(&self.order_index, 0),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TeamMemberForm {
    pub name: Option<String>,
    pub position: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub email: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub is_leadership: Option<String>,
    pub is_active: Option<String>,
    pub order_index: Option<String>,
}

impl TeamMemberForm {
    pub fn into_input(self) -> TeamMemberInput {
        TeamMemberInput {
            name: text(&self.name),
            position: text(&self.position),
            bio: optional_text(&self.bio),
            photo_url: optional_text(&self.photo_url),
            email: optional_text(&self.email),
            linkedin: optional_text(&self.linkedin),
            twitter: optional_text(&self.twitter),
            order_index: int_or(&self.order_index, 0),
            is_leadership: checkbox(&self.is_leadership),
            is_active: checkbox(&self.is_active),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StatisticForm {
    pub stat_id: Option<String>,
    pub label: Option<String>,
    pub value: Option<String>,
    pub suffix: Option<String>,
    pub icon: Option<String>,
    pub order_index: Option<String>,
    pub is_active: Option<String>,
}

impl StatisticForm {
    /// Existing statistic to update, if any
    pub fn stat_id(&self) -> Option<i64> {
        parse_int(&self.stat_id)
    }

    pub fn into_input(self) -> StatisticInput {
        StatisticInput {
            label: text(&self.label),
            value: text(&self.value),
            suffix: optional_text(&self.suffix),
            icon: optional_text(&self.icon),
            order_index: int_or(&self.order_index, 0),
            is_active: checkbox(&self.is_active),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FeatureForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub image_url: Option<String>,
    pub order_index: Option<String>,
    pub is_active: Option<String>,
}

impl FeatureForm {
    pub fn into_input(self) -> FeatureInput {
        FeatureInput {
            title: text(&self.title),
            description: optional_text(&self.description),
            icon: optional_text(&self.icon),
            image_url: optional_text(&self.image_url),
            order_index: int_or(&self.order_index, 0),
            is_active: checkbox(&self.is_active),
        }
    }
}
