//! Blog category repository
//!
//! Deleting a category leaves its posts in place with `category_id = NULL`
//! (enforced by the foreign key).

use crate::models::BlogCategory;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteExecutor, SqlitePool};
use std::sync::Arc;

/// Blog category repository trait
#[async_trait]
pub trait BlogCategoryRepository: Send + Sync {
    /// Create a new category
    async fn create(&self, category: &BlogCategory) -> Result<BlogCategory>;

    /// Get category by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<BlogCategory>>;

    /// Get category by slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<BlogCategory>>;

    /// List all categories in creation order
    async fn list(&self) -> Result<Vec<BlogCategory>>;

    /// Update an existing category
    async fn update(&self, category: &BlogCategory) -> Result<BlogCategory>;

    /// Delete a category. Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Count all categories
    async fn count(&self) -> Result<i64>;

    /// Check if a slug is taken, optionally ignoring one category
    async fn exists_by_slug(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool>;
}

/// SQLx-based blog category repository implementation
pub struct SqlxBlogCategoryRepository {
    pool: SqlitePool,
}

impl SqlxBlogCategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn BlogCategoryRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl BlogCategoryRepository for SqlxBlogCategoryRepository {
    async fn create(&self, category: &BlogCategory) -> Result<BlogCategory> {
        let id = insert_category(&self.pool, category).await?;
        Ok(BlogCategory {
            id,
            ..category.clone()
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<BlogCategory>> {
        let row = sqlx::query("SELECT id, name, slug, description FROM blog_categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get category by ID")?;

        row.as_ref().map(row_to_category).transpose()
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<BlogCategory>> {
        let row =
            sqlx::query("SELECT id, name, slug, description FROM blog_categories WHERE slug = ?")
                .bind(slug)
                .fetch_optional(&self.pool)
                .await
                .context("Failed to get category by slug")?;

        row.as_ref().map(row_to_category).transpose()
    }

    async fn list(&self) -> Result<Vec<BlogCategory>> {
        let rows = sqlx::query("SELECT id, name, slug, description FROM blog_categories ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list categories")?;

        rows.iter().map(row_to_category).collect()
    }

    async fn update(&self, category: &BlogCategory) -> Result<BlogCategory> {
        let result = sqlx::query(
            r#"
            UPDATE blog_categories
            SET name = ?, slug = ?, description = ?
            WHERE id = ?
            "#,
        )
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(category.id)
        .execute(&self.pool)
        .await
        .context("Failed to update category")?;

        if result.rows_affected() == 0 {
            anyhow::bail!("Category with id {} not found", category.id);
        }

        Ok(category.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM blog_categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete category")?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        count_categories(&self.pool).await
    }

    async fn exists_by_slug(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM blog_categories WHERE slug = ? AND id != ?",
        )
        .bind(slug)
        .bind(exclude_id.unwrap_or(0))
        .fetch_one(&self.pool)
        .await
        .context("Failed to check category slug")?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }
}

pub(crate) async fn insert_category<'e, E>(executor: E, category: &BlogCategory) -> Result<i64>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO blog_categories (name, slug, description)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(&category.name)
    .bind(&category.slug)
    .bind(&category.description)
    .execute(executor)
    .await
    .context("Failed to create category")?;

    Ok(result.last_insert_rowid())
}

pub(crate) async fn count_categories<'e, E>(executor: E) -> Result<i64>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query("SELECT COUNT(*) as count FROM blog_categories")
        .fetch_one(executor)
        .await
        .context("Failed to count categories")?;
    Ok(row.get("count"))
}

fn row_to_category(row: &SqliteRow) -> Result<BlogCategory> {
    Ok(BlogCategory {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        description: row.get("description"),
    })
}
