//! Testimonial repository

use crate::models::Testimonial;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

const TESTIMONIAL_COLUMNS: &str = "id, name, location, role, avatar_url, testimonial, rating, \
     yield_increase, water_saved, income_increase, video_url, is_featured, is_active, \
     order_index, created_at";

/// Testimonial repository trait
#[async_trait]
pub trait TestimonialRepository: Send + Sync {
    async fn create(&self, testimonial: &Testimonial) -> Result<Testimonial>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Testimonial>>;

    /// All testimonials ordered by `order_index`
    async fn list(&self) -> Result<Vec<Testimonial>>;

    /// Active testimonials ordered by `order_index`
    async fn list_active(&self) -> Result<Vec<Testimonial>>;

    /// First active featured testimonial by `order_index`
    async fn first_featured_active(&self) -> Result<Option<Testimonial>>;

    async fn update(&self, testimonial: &Testimonial) -> Result<Testimonial>;

    /// Delete a testimonial. Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool>;

    async fn count_active(&self) -> Result<i64>;

    /// Most recently created testimonials
    async fn recent(&self, limit: i64) -> Result<Vec<Testimonial>>;
}

/// SQLx-based testimonial repository implementation
pub struct SqlxTestimonialRepository {
    pool: SqlitePool,
}

impl SqlxTestimonialRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn TestimonialRepository> {
        Arc::new(Self::new(pool))
    }

    async fn select(&self, tail: &str, context: &'static str) -> Result<Vec<Testimonial>> {
        let sql = format!("SELECT {} FROM testimonials {}", TESTIMONIAL_COLUMNS, tail);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context(context)?;

        rows.iter().map(row_to_testimonial).collect()
    }
}

#[async_trait]
impl TestimonialRepository for SqlxTestimonialRepository {
    async fn create(&self, testimonial: &Testimonial) -> Result<Testimonial> {
        let result = sqlx::query(
            r#"
            INSERT INTO testimonials (name, location, role, avatar_url, testimonial, rating,
                                      yield_increase, water_saved, income_increase, video_url,
                                      is_featured, is_active, order_index, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&testimonial.name)
        .bind(&testimonial.location)
        .bind(&testimonial.role)
        .bind(&testimonial.avatar_url)
        .bind(&testimonial.testimonial)
        .bind(testimonial.rating)
        .bind(&testimonial.yield_increase)
        .bind(&testimonial.water_saved)
        .bind(&testimonial.income_increase)
        .bind(&testimonial.video_url)
        .bind(testimonial.is_featured)
        .bind(testimonial.is_active)
        .bind(testimonial.order_index)
        .bind(testimonial.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to create testimonial")?;

        Ok(Testimonial {
            id: result.last_insert_rowid(),
            ..testimonial.clone()
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Testimonial>> {
        let sql = format!("SELECT {} FROM testimonials WHERE id = ?", TESTIMONIAL_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get testimonial by ID")?;

        row.as_ref().map(row_to_testimonial).transpose()
    }

    async fn list(&self) -> Result<Vec<Testimonial>> {
        self.select("ORDER BY order_index ASC, id ASC", "Failed to list testimonials")
            .await
    }

    async fn list_active(&self) -> Result<Vec<Testimonial>> {
        self.select(
            "WHERE is_active = 1 ORDER BY order_index ASC, id ASC",
            "Failed to list active testimonials",
        )
        .await
    }

    async fn first_featured_active(&self) -> Result<Option<Testimonial>> {
        let mut rows = self
            .select(
                "WHERE is_active = 1 AND is_featured = 1 ORDER BY order_index ASC, id ASC LIMIT 1",
                "Failed to get featured testimonial",
            )
            .await?;
        Ok(rows.pop())
    }

    async fn update(&self, testimonial: &Testimonial) -> Result<Testimonial> {
        let result = sqlx::query(
            r#"
            UPDATE testimonials
            SET name = ?, location = ?, role = ?, avatar_url = ?, testimonial = ?, rating = ?,
                yield_increase = ?, water_saved = ?, income_increase = ?, video_url = ?,
                is_featured = ?, is_active = ?, order_index = ?
            WHERE id = ?
            "#,
        )
        .bind(&testimonial.name)
        .bind(&testimonial.location)
        .bind(&testimonial.role)
        .bind(&testimonial.avatar_url)
        .bind(&testimonial.testimonial)
        .bind(testimonial.rating)
        .bind(&testimonial.yield_increase)
        .bind(&testimonial.water_saved)
        .bind(&testimonial.income_increase)
        .bind(&testimonial.video_url)
        .bind(testimonial.is_featured)
        .bind(testimonial.is_active)
        .bind(testimonial.order_index)
        .bind(testimonial.id)
        .execute(&self.pool)
        .await
        .context("Failed to update testimonial")?;

        if result.rows_affected() == 0 {
            anyhow::bail!("Testimonial with id {} not found", testimonial.id);
        }

        Ok(testimonial.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM testimonials WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete testimonial")?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_active(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM testimonials WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count testimonials")?;
        Ok(row.get("count"))
    }

    async fn recent(&self, limit: i64) -> Result<Vec<Testimonial>> {
        let sql = format!(
            "SELECT {} FROM testimonials ORDER BY created_at DESC, id DESC LIMIT ?",
            TESTIMONIAL_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .context("Failed to get recent testimonials")?;

        rows.iter().map(row_to_testimonial).collect()
    }
}

fn row_to_testimonial(row: &SqliteRow) -> Result<Testimonial> {
    Ok(Testimonial {
        id: row.get("id"),
        name: row.get("name"),
        location: row.get("location"),
        role: row.get("role"),
        avatar_url: row.get("avatar_url"),
        testimonial: row.get("testimonial"),
        rating: row.get("rating"),
        yield_increase: row.get("yield_increase"),
        water_saved: row.get("water_saved"),
        income_increase: row.get("income_increase"),
        video_url: row.get("video_url"),
        is_featured: row.get("is_featured"),
        is_active: row.get("is_active"),
        order_index: row.get("order_index"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> (SqlitePool, SqlxTestimonialRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxTestimonialRepository::new(pool.clone());
        (pool, repo)
    }

    fn create_test_testimonial(name: &str, order: i64) -> Testimonial {
        let mut t = Testimonial::new(name.to_string(), "Great results".to_string());
        t.order_index = order;
        t
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (_pool, repo) = setup_test_repo().await;

        let mut t = create_test_testimonial("Ravi", 0);
        t.location = Some("Pune".to_string());
        t.yield_increase = Some("30%".to_string());
        let created = repo.create(&t).await.expect("Failed to create testimonial");

        let found = repo
            .get_by_id(created.id)
            .await
            .expect("Query failed")
            .expect("Testimonial not found");
        assert_eq!(found.name, "Ravi");
        assert_eq!(found.location.as_deref(), Some("Pune"));
        assert_eq!(found.yield_increase.as_deref(), Some("30%"));
        assert_eq!(found.rating, 5);
        assert!(found.is_active);
    }

    #[tokio::test]
    async fn test_active_and_featured() {
        let (_pool, repo) = setup_test_repo().await;

        let mut hidden = create_test_testimonial("Hidden", 0);
        hidden.is_active = false;
        hidden.is_featured = true;
        repo.create(&hidden).await.expect("create");

        repo.create(&create_test_testimonial("Second", 2)).await.expect("create");
        let mut first = create_test_testimonial("First", 1);
        first.is_featured = true;
        repo.create(&first).await.expect("create");

        let names: Vec<String> = repo
            .list_active()
            .await
            .expect("list")
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
        assert_eq!(repo.list().await.expect("list").len(), 3);
        assert_eq!(repo.count_active().await.expect("count"), 2);

        let featured = repo
            .first_featured_active()
            .await
            .expect("query")
            .expect("missing");
        assert_eq!(featured.name, "First");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (_pool, repo) = setup_test_repo().await;
        let mut t = repo
            .create(&create_test_testimonial("Asha", 0))
            .await
            .expect("create");

        t.rating = 4;
        t.role = Some("Rice Farmer".to_string());
        repo.update(&t).await.expect("update");

        let found = repo.get_by_id(t.id).await.expect("query").expect("missing");
        assert_eq!(found.rating, 4);
        assert_eq!(found.role.as_deref(), Some("Rice Farmer"));

        assert!(repo.delete(t.id).await.expect("delete"));
        assert!(!repo.delete(t.id).await.expect("delete"));
        assert!(repo.recent(5).await.expect("recent").is_empty());
    }
}
