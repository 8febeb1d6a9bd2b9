//! Blog service
//!
//! Public listing and detail pages, admin post and category management,
//! and the JSON search endpoint.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::repositories::{BlogCategoryRepository, BlogPostRepository};
use crate::models::{
    BlogCategory, BlogPost, ListParams, PagedResult, SearchResult, DEFAULT_AUTHOR,
    DEFAULT_READ_TIME,
};
use crate::services::markdown::MarkdownRenderer;
use crate::services::slug::create_slug;

/// Posts per page on the public blog
pub const PUBLIC_PER_PAGE: u32 = 9;

/// Posts per page in the admin list
pub const ADMIN_PER_PAGE: u32 = 20;

/// Related posts shown under a post
pub const RELATED_LIMIT: i64 = 3;

/// Maximum search results
pub const SEARCH_LIMIT: i64 = 10;

/// Entries in the dashboard "recent" lists
pub const RECENT_LIMIT: i64 = 5;

/// Blog service errors
#[derive(Debug, thiserror::Error)]
pub enum BlogServiceError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Submitted blog post fields, already coerced from the form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostInput {
    pub title: String,
    /// Explicit slug; derived from the title when absent
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: String,
    pub featured_image: Option<String>,
    pub author: Option<String>,
    pub category_id: Option<i64>,
    pub tags: Option<String>,
    pub meta_description: Option<String>,
    pub read_time: Option<i64>,
    pub is_published: bool,
    pub is_featured: bool,
}

impl PostInput {
    /// Copy the submitted fields onto `post`, deriving the slug.
    pub fn apply_to(&self, post: &mut BlogPost) {
        let slug_source = self.slug.as_deref().unwrap_or(&self.title);

        post.title = self.title.clone();
        post.slug = create_slug(slug_source);
        post.excerpt = self.excerpt.clone();
        post.content = self.content.clone();
        post.featured_image = self.featured_image.clone();
        post.author = self
            .author
            .clone()
            .unwrap_or_else(|| DEFAULT_AUTHOR.to_string());
        post.category_id = self.category_id;
        post.tags = self.tags.clone();
        post.meta_description = self.meta_description.clone();
        post.read_time = self.read_time.unwrap_or(DEFAULT_READ_TIME);
        post.is_published = self.is_published;
        post.is_featured = self.is_featured;
    }
}

/// Submitted category fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    /// Explicit slug; derived from the name when absent
    pub slug: Option<String>,
    pub description: Option<String>,
}

impl CategoryInput {
    pub fn apply_to(&self, category: &mut BlogCategory) {
        category.name = self.name.clone();
        category.slug = create_slug(self.slug.as_deref().unwrap_or(&self.name));
        category.description = self.description.clone();
    }
}

/// Data for the public blog listing
#[derive(Debug, Clone, Serialize)]
pub struct BlogListing {
    pub posts: PagedResult<BlogPost>,
    pub categories: Vec<BlogCategory>,
    pub featured_post: Option<BlogPost>,
    pub current_category: Option<String>,
}

impl BlogListing {
    /// A listing with no posts, used when the store cannot be read
    pub fn empty(page: u32, category_slug: Option<&str>) -> Self {
        Self {
            posts: PagedResult::new(Vec::new(), 0, &ListParams::new(page, PUBLIC_PER_PAGE)),
            categories: Vec::new(),
            featured_post: None,
            current_category: category_slug.filter(|s| !s.is_empty()).map(String::from),
        }
    }
}

/// Data for a single post page
#[derive(Debug, Clone, Serialize)]
pub struct BlogDetail {
    pub post: BlogPost,
    pub content_html: String,
    pub related_posts: Vec<BlogPost>,
}

/// Blog service
pub struct BlogService {
    posts: Arc<dyn BlogPostRepository>,
    categories: Arc<dyn BlogCategoryRepository>,
    markdown: MarkdownRenderer,
}

impl BlogService {
    pub fn new(
        posts: Arc<dyn BlogPostRepository>,
        categories: Arc<dyn BlogCategoryRepository>,
    ) -> Self {
        Self {
            posts,
            categories,
            markdown: MarkdownRenderer::new(),
        }
    }

    /// Published posts for the public blog page.
    ///
    /// An unknown category slug lists every published post.
    pub async fn public_listing(
        &self,
        page: u32,
        category_slug: Option<&str>,
    ) -> Result<BlogListing, BlogServiceError> {
        let params = ListParams::new(page, PUBLIC_PER_PAGE);

        let category_id = match category_slug {
            Some(slug) if !slug.is_empty() => {
                self.categories.get_by_slug(slug).await?.map(|c| c.id)
            }
            _ => None,
        };

        let (items, total) = self.posts.list_published(category_id, &params).await?;

        Ok(BlogListing {
            posts: PagedResult::new(items, total, &params),
            categories: self.categories.list().await?,
            featured_post: self.posts.first_featured_published().await?,
            current_category: category_slug.filter(|s| !s.is_empty()).map(String::from),
        })
    }

    /// A published post by slug; counts the view.
    pub async fn published_detail(&self, slug: &str) -> Result<BlogDetail, BlogServiceError> {
        let mut post = self
            .posts
            .get_published_by_slug(slug)
            .await?
            .ok_or_else(|| BlogServiceError::NotFound(format!("Post '{}'", slug)))?;

        self.posts.increment_views(post.id).await?;
        post.views += 1;

        let related_posts = self.posts.related(&post, RELATED_LIMIT).await?;
        let content_html = self.markdown.render(&post.content);

        Ok(BlogDetail {
            post,
            content_html,
            related_posts,
        })
    }

    /// Every post for the admin list, newest first
    pub async fn admin_listing(
        &self,
        page: u32,
    ) -> Result<(PagedResult<BlogPost>, Vec<BlogCategory>), BlogServiceError> {
        let params = ListParams::new(page, ADMIN_PER_PAGE);
        let (items, total) = self.posts.list_all(&params).await?;
        let categories = self.categories.list().await?;
        Ok((PagedResult::new(items, total, &params), categories))
    }

    pub async fn get_post(&self, id: i64) -> Result<BlogPost, BlogServiceError> {
        self.posts
            .get_by_id(id)
            .await?
            .ok_or_else(|| BlogServiceError::NotFound(format!("Post {}", id)))
    }

    /// Create (`id == None`) or update a post.
    ///
    /// `published_at` is stamped the first time the post is saved as
    /// published and kept afterwards. A category that no longer exists is
    /// dropped rather than rejected.
    pub async fn save_post(
        &self,
        id: Option<i64>,
        input: &PostInput,
    ) -> Result<BlogPost, BlogServiceError> {
        let mut post = match id {
            Some(id) => self.get_post(id).await?,
            None => BlogPost::new(String::new(), String::new(), String::new()),
        };

        if input.title.trim().is_empty() {
            return Err(BlogServiceError::Validation("Title is required".to_string()));
        }

        input.apply_to(&mut post);

        if post.slug.is_empty() {
            return Err(BlogServiceError::Validation(
                "Slug cannot be empty; use letters or numbers in the title or slug".to_string(),
            ));
        }
        if self.posts.exists_by_slug(&post.slug, id).await? {
            return Err(BlogServiceError::Validation(format!(
                "A post with slug '{}' already exists",
                post.slug
            )));
        }

        if let Some(category_id) = post.category_id {
            if self.categories.get_by_id(category_id).await?.is_none() {
                post.category_id = None;
            }
        }

        post.mark_published_if_needed();

        let saved = if id.is_some() {
            self.posts.update(&post).await?
        } else {
            self.posts.create(&post).await?
        };

        tracing::info!("Saved blog post {} ({})", saved.id, saved.slug);
        Ok(saved)
    }

    pub async fn delete_post(&self, id: i64) -> Result<(), BlogServiceError> {
        if !self.posts.delete(id).await? {
            return Err(BlogServiceError::NotFound(format!("Post {}", id)));
        }
        tracing::info!("Deleted blog post {}", id);
        Ok(())
    }

    pub async fn list_categories(&self) -> Result<Vec<BlogCategory>, BlogServiceError> {
        Ok(self.categories.list().await?)
    }

    pub async fn get_category(&self, id: i64) -> Result<BlogCategory, BlogServiceError> {
        self.categories
            .get_by_id(id)
            .await?
            .ok_or_else(|| BlogServiceError::NotFound(format!("Category {}", id)))
    }

    /// Create (`id == None`) or update a category
    pub async fn save_category(
        &self,
        id: Option<i64>,
        input: &CategoryInput,
    ) -> Result<BlogCategory, BlogServiceError> {
        let mut category = match id {
            Some(id) => self.get_category(id).await?,
            None => BlogCategory::new(String::new(), String::new(), None),
        };

        if input.name.trim().is_empty() {
            return Err(BlogServiceError::Validation("Name is required".to_string()));
        }

        input.apply_to(&mut category);

        if category.slug.is_empty() {
            return Err(BlogServiceError::Validation("Slug cannot be empty".to_string()));
        }
        if self.categories.exists_by_slug(&category.slug, id).await? {
            return Err(BlogServiceError::Validation(format!(
                "A category with slug '{}' already exists",
                category.slug
            )));
        }

        let saved = if id.is_some() {
            self.categories.update(&category).await?
        } else {
            self.categories.create(&category).await?
        };
        Ok(saved)
    }

    /// Delete a category; its posts become uncategorized.
    pub async fn delete_category(&self, id: i64) -> Result<(), BlogServiceError> {
        if !self.categories.delete(id).await? {
            return Err(BlogServiceError::NotFound(format!("Category {}", id)));
        }
        Ok(())
    }

    /// Published posts matching `query`. A blank query matches nothing.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, BlogServiceError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let posts = self.posts.search(query, SEARCH_LIMIT).await?;
        Ok(posts.into_iter().map(SearchResult::from).collect())
    }

    /// `(total, published)` post counts
    pub async fn post_counts(&self) -> Result<(i64, i64), BlogServiceError> {
        Ok((
            self.posts.count().await?,
            self.posts.count_published().await?,
        ))
    }

    pub async fn recent_posts(&self) -> Result<Vec<BlogPost>, BlogServiceError> {
        Ok(self.posts.recent(RECENT_LIMIT).await?)
    }
}
