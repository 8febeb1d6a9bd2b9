//! Blog models
//!
//! Categories and posts. A post belongs to at most one category; deleting
//! the category leaves the post uncategorized.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default author for posts saved without one
pub const DEFAULT_AUTHOR: &str = "Admin";

/// Default reading time in minutes
pub const DEFAULT_READ_TIME: i64 = 5;

/// Blog category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlogCategory {
    pub id: i64,
    /// Category name (unique)
    pub name: String,
    /// URL-friendly slug (unique)
    pub slug: String,
    pub description: Option<String>,
}

impl BlogCategory {
    /// Create a new category; the ID is assigned by the database.
    pub fn new(name: String, slug: String, description: Option<String>) -> Self {
        Self {
            id: 0,
            name,
            slug,
            description,
        }
    }
}

/// Blog post
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    /// URL-friendly slug (unique)
    pub slug: String,
    pub excerpt: Option<String>,
    /// Markdown body
    pub content: String,
    pub featured_image: Option<String>,
    pub author: String,
    pub category_id: Option<i64>,
    /// Comma-separated tags
    pub tags: Option<String>,
    pub meta_description: Option<String>,
    /// Estimated reading time in minutes
    pub read_time: i64,
    pub is_published: bool,
    pub is_featured: bool,
    pub views: i64,
    /// Set the first time the post is saved as published
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Joined from the category table on reads
    #[serde(default)]
    pub category_name: Option<String>,
    /// Joined from the category table on reads
    #[serde(default)]
    pub category_slug: Option<String>,
}

impl BlogPost {
    /// Create an unsaved draft with default metadata.
    pub fn new(title: String, slug: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            title,
            slug,
            excerpt: None,
            content,
            featured_image: None,
            author: DEFAULT_AUTHOR.to_string(),
            category_id: None,
            tags: None,
            meta_description: None,
            read_time: DEFAULT_READ_TIME,
            is_published: false,
            is_featured: false,
            views: 0,
            published_at: None,
            created_at: now,
            updated_at: now,
            category_name: None,
            category_slug: None,
        }
    }

    /// Public URL of the post
    pub fn url(&self) -> String {
        format!("/blog/{}", self.slug)
    }

    /// Tags split on commas, trimmed, empties dropped
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    }

    /// Stamp `published_at` if the post is published and has never been.
    pub fn mark_published_if_needed(&mut self) {
        if self.is_published && self.published_at.is_none() {
            self.published_at = Some(Utc::now());
        }
    }
}

/// Entry returned by the blog search endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub url: String,
}

impl From<BlogPost> for SearchResult {
    fn from(post: BlogPost) -> Self {
        let url = post.url();
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            excerpt: post.excerpt,
            url,
        }
    }
}
