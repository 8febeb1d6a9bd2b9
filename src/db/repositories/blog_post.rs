//! Blog post repository
//!
//! Reads join the category so templates can show its name and link without
//! a second query.

use crate::models::{BlogPost, ListParams};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

const POST_COLUMNS: &str = r#"
    p.id, p.title, p.slug, p.excerpt, p.content, p.featured_image, p.author,
    p.category_id, p.tags, p.meta_description, p.read_time, p.is_published,
    p.is_featured, p.views, p.published_at, p.created_at, p.updated_at,
    c.name AS category_name, c.slug AS category_slug
"#;

const POST_FROM: &str = "FROM blog_posts p LEFT JOIN blog_categories c ON c.id = p.category_id";

/// Blog post repository trait
#[async_trait]
pub trait BlogPostRepository: Send + Sync {
    /// Create a new post
    async fn create(&self, post: &BlogPost) -> Result<BlogPost>;

    /// Get post by ID, published or not
    async fn get_by_id(&self, id: i64) -> Result<Option<BlogPost>>;

    /// Get a published post by slug
    async fn get_published_by_slug(&self, slug: &str) -> Result<Option<BlogPost>>;

    /// Check if a slug is taken, optionally ignoring one post
    async fn exists_by_slug(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool>;

    /// Update an existing post
    async fn update(&self, post: &BlogPost) -> Result<BlogPost>;

    /// Delete a post. Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Published posts, newest `published_at` first, optionally in one category
    async fn list_published(
        &self,
        category_id: Option<i64>,
        params: &ListParams,
    ) -> Result<(Vec<BlogPost>, i64)>;

    /// All posts, newest `created_at` first
    async fn list_all(&self, params: &ListParams) -> Result<(Vec<BlogPost>, i64)>;

    /// Most recently published featured post
    async fn first_featured_published(&self) -> Result<Option<BlogPost>>;

    /// Random published posts sharing the category of `post` (or lack of one)
    async fn related(&self, post: &BlogPost, limit: i64) -> Result<Vec<BlogPost>>;

    /// Bump the view counter
    async fn increment_views(&self, id: i64) -> Result<()>;

    /// Published posts whose title, content or tags contain `query`
    async fn search(&self, query: &str, limit: i64) -> Result<Vec<BlogPost>>;

    /// Count all posts
    async fn count(&self) -> Result<i64>;

    /// Count published posts
    async fn count_published(&self) -> Result<i64>;

    /// Most recently created posts
    async fn recent(&self, limit: i64) -> Result<Vec<BlogPost>>;
}

/// SQLx-based blog post repository implementation
pub struct SqlxBlogPostRepository {
    pool: SqlitePool,
}

impl SqlxBlogPostRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn BlogPostRepository> {
        Arc::new(Self::new(pool))
    }

    async fn count_where(&self, filter: &str, category_id: Option<i64>) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) as count FROM blog_posts p WHERE {}", filter);
        let mut query = sqlx::query(&sql);
        if let Some(id) = category_id {
            query = query.bind(id);
        }
        let row = query
            .fetch_one(&self.pool)
            .await
            .context("Failed to count blog posts")?;
        Ok(row.get("count"))
    }
}

#[async_trait]
impl BlogPostRepository for SqlxBlogPostRepository {
    async fn create(&self, post: &BlogPost) -> Result<BlogPost> {
        let result = sqlx::query(
            r#"
            INSERT INTO blog_posts (title, slug, excerpt, content, featured_image, author,
                                    category_id, tags, meta_description, read_time,
                                    is_published, is_featured, views, published_at,
                                    created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.featured_image)
        .bind(&post.author)
        .bind(post.category_id)
        .bind(&post.tags)
        .bind(&post.meta_description)
        .bind(post.read_time)
        .bind(post.is_published)
        .bind(post.is_featured)
        .bind(post.views)
        .bind(post.published_at)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to create blog post")?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Blog post {} vanished after insert", id))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<BlogPost>> {
        let sql = format!("SELECT {} {} WHERE p.id = ?", POST_COLUMNS, POST_FROM);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get blog post by ID")?;

        row.as_ref().map(row_to_post).transpose()
    }

    async fn get_published_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        let sql = format!(
            "SELECT {} {} WHERE p.slug = ? AND p.is_published = 1",
            POST_COLUMNS, POST_FROM
        );
        let row = sqlx::query(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get blog post by slug")?;

        row.as_ref().map(row_to_post).transpose()
    }

    async fn exists_by_slug(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM blog_posts WHERE slug = ? AND id != ?")
            .bind(slug)
            .bind(exclude_id.unwrap_or(0))
            .fetch_one(&self.pool)
            .await
            .context("Failed to check blog post slug")?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    async fn update(&self, post: &BlogPost) -> Result<BlogPost> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE blog_posts
            SET title = ?, slug = ?, excerpt = ?, content = ?, featured_image = ?, author = ?,
                category_id = ?, tags = ?, meta_description = ?, read_time = ?,
                is_published = ?, is_featured = ?, published_at = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.featured_image)
        .bind(&post.author)
        .bind(post.category_id)
        .bind(&post.tags)
        .bind(&post.meta_description)
        .bind(post.read_time)
        .bind(post.is_published)
        .bind(post.is_featured)
        .bind(post.published_at)
        .bind(now)
        .bind(post.id)
        .execute(&self.pool)
        .await
        .context("Failed to update blog post")?;

        if result.rows_affected() == 0 {
            anyhow::bail!("Blog post with id {} not found", post.id);
        }

        self.get_by_id(post.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Blog post {} vanished after update", post.id))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete blog post")?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_published(
        &self,
        category_id: Option<i64>,
        params: &ListParams,
    ) -> Result<(Vec<BlogPost>, i64)> {
        let filter = if category_id.is_some() {
            "p.is_published = 1 AND p.category_id = ?"
        } else {
            "p.is_published = 1"
        };

        let total = self.count_where(filter, category_id).await?;

        let sql = format!(
            "SELECT {} {} WHERE {} ORDER BY p.published_at DESC, p.id DESC LIMIT ? OFFSET ?",
            POST_COLUMNS, POST_FROM, filter
        );
        let mut query = sqlx::query(&sql);
        if let Some(id) = category_id {
            query = query.bind(id);
        }
        let rows = query
            .bind(params.limit())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await
            .context("Failed to list published blog posts")?;

        let posts = rows.iter().map(row_to_post).collect::<Result<Vec<_>>>()?;
        Ok((posts, total))
    }

    async fn list_all(&self, params: &ListParams) -> Result<(Vec<BlogPost>, i64)> {
        let total = self.count().await?;

        let sql = format!(
            "SELECT {} {} ORDER BY p.created_at DESC, p.id DESC LIMIT ? OFFSET ?",
            POST_COLUMNS, POST_FROM
        );
        let rows = sqlx::query(&sql)
            .bind(params.limit())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await
            .context("Failed to list blog posts")?;

        let posts = rows.iter().map(row_to_post).collect::<Result<Vec<_>>>()?;
        Ok((posts, total))
    }

    async fn first_featured_published(&self) -> Result<Option<BlogPost>> {
        let sql = format!(
            "SELECT {} {} WHERE p.is_published = 1 AND p.is_featured = 1 \
             ORDER BY p.published_at DESC, p.id DESC LIMIT 1",
            POST_COLUMNS, POST_FROM
        );
        let row = sqlx::query(&sql)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get featured blog post")?;

        row.as_ref().map(row_to_post).transpose()
    }

    async fn related(&self, post: &BlogPost, limit: i64) -> Result<Vec<BlogPost>> {
        // Uncategorized posts relate to other uncategorized posts
        let category_filter = if post.category_id.is_some() {
            "p.category_id = ?"
        } else {
            "p.category_id IS NULL"
        };

        let sql = format!(
            "SELECT {} {} WHERE p.id != ? AND {} AND p.is_published = 1 \
             ORDER BY RANDOM() LIMIT ?",
            POST_COLUMNS, POST_FROM, category_filter
        );
        let mut query = sqlx::query(&sql).bind(post.id);
        if let Some(category_id) = post.category_id {
            query = query.bind(category_id);
        }
        let rows = query
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .context("Failed to get related blog posts")?;

        rows.iter().map(row_to_post).collect()
    }

    async fn increment_views(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE blog_posts SET views = views + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to increment blog post views")?;
        Ok(())
    }

    async fn search(&self, query: &str, limit: i64) -> Result<Vec<BlogPost>> {
        let pattern = format!("%{}%", escape_like(query));
        let sql = format!(
            r#"SELECT {} {}
               WHERE p.is_published = 1
                 AND (p.title LIKE ? ESCAPE '\' OR p.content LIKE ? ESCAPE '\' OR p.tags LIKE ? ESCAPE '\')
               ORDER BY p.published_at DESC, p.id DESC
               LIMIT ?"#,
            POST_COLUMNS, POST_FROM
        );
        let rows = sqlx::query(&sql)
            .bind(&pattern)
            .bind(&pattern)
            .bind(&pattern)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .context("Failed to search blog posts")?;

        rows.iter().map(row_to_post).collect()
    }

    async fn count(&self) -> Result<i64> {
        self.count_where("1 = 1", None).await
    }

    async fn count_published(&self) -> Result<i64> {
        self.count_where("p.is_published = 1", None).await
    }

    async fn recent(&self, limit: i64) -> Result<Vec<BlogPost>> {
        let sql = format!(
            "SELECT {} {} ORDER BY p.created_at DESC, p.id DESC LIMIT ?",
            POST_COLUMNS, POST_FROM
        );
        let rows = sqlx::query(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .context("Failed to get recent blog posts")?;

        rows.iter().map(row_to_post).collect()
    }
}

/// Escape LIKE wildcards so user input matches literally
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn row_to_post(row: &SqliteRow) -> Result<BlogPost> {
    Ok(BlogPost {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        excerpt: row.get("excerpt"),
        content: row.get("content"),
        featured_image: row.get("featured_image"),
        author: row.get("author"),
        category_id: row.get("category_id"),
        tags: row.get("tags"),
        meta_description: row.get("meta_description"),
        read_time: row.get("read_time"),
        is_published: row.get("is_published"),
        is_featured: row.get("is_featured"),
        views: row.get("views"),
        published_at: row.get("published_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        category_name: row.get("category_name"),
        category_slug: row.get("category_slug"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::blog_category::{
        BlogCategoryRepository, SqlxBlogCategoryRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::models::BlogCategory;
    use chrono::Duration;

    async fn setup_test_repo() -> (SqlitePool, SqlxBlogPostRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxBlogPostRepository::new(pool.clone());
        (pool, repo)
    }

    async fn create_category(pool: &SqlitePool, slug: &str) -> BlogCategory {
        SqlxBlogCategoryRepository::new(pool.clone())
            .create(&BlogCategory::new(slug.to_uppercase(), slug.to_string(), None))
            .await
            .expect("Failed to create category")
    }

    fn published(title: &str, slug: &str, minutes_ago: i64) -> BlogPost {
        let mut post = BlogPost::new(title.to_string(), slug.to_string(), "Body".to_string());
        post.is_published = true;
        post.published_at = Some(Utc::now() - Duration::minutes(minutes_ago));
        post
    }

    #[tokio::test]
    async fn test_create_joins_category() {
        let (pool, repo) = setup_test_repo().await;
        let cat = create_category(&pool, "technology").await;

        let mut post = published("Drones", "drones", 0);
        post.category_id = Some(cat.id);
        let created = repo.create(&post).await.expect("Failed to create post");

        assert!(created.id > 0);
        assert_eq!(created.category_name.as_deref(), Some("TECHNOLOGY"));
        assert_eq!(created.category_slug.as_deref(), Some("technology"));
        assert_eq!(created.author, "Admin");
        assert_eq!(created.read_time, 5);
    }

    #[tokio::test]
    async fn test_get_published_by_slug_hides_drafts() {
        let (_pool, repo) = setup_test_repo().await;
        let draft = BlogPost::new("Draft".into(), "draft".into(), "Body".into());
        let draft = repo.create(&draft).await.expect("Failed to create post");

        assert!(repo.get_by_id(draft.id).await.expect("Query failed").is_some());
        assert!(repo
            .get_published_by_slug("draft")
            .await
            .expect("Query failed")
            .is_none());
    }

    #[tokio::test]
    async fn test_list_published_order_and_filter() {
        let (pool, repo) = setup_test_repo().await;
        let cat = create_category(&pool, "soil").await;

        repo.create(&published("Old", "old", 30)).await.expect("create");
        let mut mid = published("Mid", "mid", 20);
        mid.category_id = Some(cat.id);
        repo.create(&mid).await.expect("create");
        repo.create(&published("New", "new", 10)).await.expect("create");
        repo.create(&BlogPost::new("Draft".into(), "draft".into(), "x".into()))
            .await
            .expect("create");

        let params = ListParams::new(1, 9);
        let (posts, total) = repo.list_published(None, &params).await.expect("list");
        assert_eq!(total, 3);
        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["new", "mid", "old"]);

        let (posts, total) = repo
            .list_published(Some(cat.id), &params)
            .await
            .expect("list");
        assert_eq!(total, 1);
        assert_eq!(posts[0].slug, "mid");

        let (posts, _) = repo
            .list_published(None, &ListParams::new(5, 9))
            .await
            .expect("list");
        assert!(posts.is_empty());
    }

    #[tokio::test]
    async fn test_list_all_includes_drafts() {
        let (_pool, repo) = setup_test_repo().await;
        repo.create(&published("A", "a", 0)).await.expect("create");
        repo.create(&BlogPost::new("B".into(), "b".into(), "x".into()))
            .await
            .expect("create");

        let (posts, total) = repo.list_all(&ListParams::new(1, 20)).await.expect("list");
        assert_eq!(total, 2);
        assert_eq!(posts.len(), 2);
        assert_eq!(repo.count_published().await.expect("count"), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (_pool, repo) = setup_test_repo().await;
        let mut post = repo.create(&published("A", "a", 0)).await.expect("create");

        post.title = "Updated".to_string();
        post.tags = Some("water".to_string());
        let updated = repo.update(&post).await.expect("Failed to update");
        assert_eq!(updated.title, "Updated");
        assert_eq!(updated.tags.as_deref(), Some("water"));

        assert!(repo.delete(post.id).await.expect("delete"));
        assert!(!repo.delete(post.id).await.expect("delete"));
    }

    #[tokio::test]
    async fn test_related_same_category_only() {
        let (pool, repo) = setup_test_repo().await;
        let cat = create_category(&pool, "market").await;

        let mut ids = Vec::new();
        for i in 0..5 {
            let mut post = published(&format!("P{}", i), &format!("p{}", i), i);
            post.category_id = Some(cat.id);
            ids.push(repo.create(&post).await.expect("create"));
        }
        let loose = repo.create(&published("Loose", "loose", 0)).await.expect("create");

        let related = repo.related(&ids[0], 3).await.expect("related");
        assert_eq!(related.len(), 3);
        assert!(related.iter().all(|p| p.id != ids[0].id));
        assert!(related.iter().all(|p| p.category_id == Some(cat.id)));

        assert!(repo.related(&loose, 3).await.expect("related").is_empty());
        let other = repo.create(&published("Other", "other", 1)).await.expect("create");
        let related = repo.related(&loose, 3).await.expect("related");
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].id, other.id);
    }

    #[tokio::test]
    async fn test_increment_views() {
        let (_pool, repo) = setup_test_repo().await;
        let post = repo.create(&published("A", "a", 0)).await.expect("create");

        repo.increment_views(post.id).await.expect("increment");
        repo.increment_views(post.id).await.expect("increment");

        let found = repo.get_by_id(post.id).await.expect("query").expect("missing");
        assert_eq!(found.views, 2);
    }

    #[tokio::test]
    async fn test_search_matches_title_content_tags() {
        let (_pool, repo) = setup_test_repo().await;

        repo.create(&published("Drip irrigation", "drip", 0)).await.expect("create");
        let mut tagged = published("Tagged", "tagged", 1);
        tagged.tags = Some("irrigation,water".to_string());
        repo.create(&tagged).await.expect("create");
        let mut body = published("Body", "body", 2);
        body.content = "About irrigation schedules".to_string();
        repo.create(&body).await.expect("create");
        let mut draft = BlogPost::new("irrigation draft".into(), "d".into(), "x".into());
        draft.is_published = false;
        repo.create(&draft).await.expect("create");

        let results = repo.search("irrigation", 10).await.expect("search");
        assert_eq!(results.len(), 3);

        let limited = repo.search("irrigation", 2).await.expect("search");
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn test_search_escapes_wildcards() {
        let (_pool, repo) = setup_test_repo().await;
        repo.create(&published("Plain", "plain", 0)).await.expect("create");

        assert!(repo.search("%", 10).await.expect("search").is_empty());
        assert!(repo.search("_", 10).await.expect("search").is_empty());
    }

    #[tokio::test]
    async fn test_featured_and_recent() {
        let (_pool, repo) = setup_test_repo().await;
        assert!(repo.first_featured_published().await.expect("query").is_none());

        let mut featured = published("Featured", "featured", 5);
        featured.is_featured = true;
        repo.create(&featured).await.expect("create");
        repo.create(&published("Plain", "plain", 0)).await.expect("create");

        let found = repo
            .first_featured_published()
            .await
            .expect("query")
            .expect("missing");
        assert_eq!(found.slug, "featured");

        assert_eq!(repo.recent(1).await.expect("recent").len(), 1);
        assert!(repo.exists_by_slug("plain", None).await.expect("check"));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("soil"), "soil");
    }
}
