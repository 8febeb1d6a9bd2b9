//! Feature repository

use crate::models::Feature;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Feature repository trait
#[async_trait]
pub trait FeatureRepository: Send + Sync {
    async fn create(&self, feature: &Feature) -> Result<Feature>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Feature>>;

    /// All features ordered by `order_index`
    async fn list(&self) -> Result<Vec<Feature>>;

    /// Active features ordered by `order_index`
    async fn list_active(&self) -> Result<Vec<Feature>>;

    async fn update(&self, feature: &Feature) -> Result<Feature>;

    /// Delete a feature. Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based feature repository implementation
pub struct SqlxFeatureRepository {
    pool: SqlitePool,
}

impl SqlxFeatureRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn FeatureRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl FeatureRepository for SqlxFeatureRepository {
    async fn create(&self, feature: &Feature) -> Result<Feature> {
        let result = sqlx::query(
            r#"
            INSERT INTO features (title, description, icon, image_url, order_index, is_active)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&feature.title)
        .bind(&feature.description)
        .bind(&feature.icon)
        .bind(&feature.image_url)
        .bind(feature.order_index)
        .bind(feature.is_active)
        .execute(&self.pool)
        .await
        .context("Failed to create feature")?;

        Ok(Feature {
            id: result.last_insert_rowid(),
            ..feature.clone()
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Feature>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, description, icon, image_url, order_index, is_active
            FROM features
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get feature by ID")?;

        row.as_ref().map(row_to_feature).transpose()
    }

    async fn list(&self) -> Result<Vec<Feature>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, icon, image_url, order_index, is_active
            FROM features
            ORDER BY order_index ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list features")?;

        rows.iter().map(row_to_feature).collect()
    }

    async fn list_active(&self) -> Result<Vec<Feature>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, icon, image_url, order_index, is_active
            FROM features
            WHERE is_active = 1
            ORDER BY order_index ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list active features")?;

        rows.iter().map(row_to_feature).collect()
    }

    async fn update(&self, feature: &Feature) -> Result<Feature> {
        let result = sqlx::query(
            r#"
            UPDATE features
            SET title = ?, description = ?, icon = ?, image_url = ?, order_index = ?, is_active = ?
            WHERE id = ?
            "#,
        )
        .bind(&feature.title)
        .bind(&feature.description)
        .bind(&feature.icon)
        .bind(&feature.image_url)
        .bind(feature.order_index)
        .bind(feature.is_active)
        .bind(feature.id)
        .execute(&self.pool)
        .await
        .context("Failed to update feature")?;

        if result.rows_affected() == 0 {
            anyhow::bail!("Feature with id {} not found", feature.id);
        }

        Ok(feature.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM features WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete feature")?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_feature(row: &SqliteRow) -> Result<Feature> {
    Ok(Feature {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        icon: row.get("icon"),
        image_url: row.get("image_url"),
        order_index: row.get("order_index"),
        is_active: row.get("is_active"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> (SqlitePool, SqlxFeatureRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxFeatureRepository::new(pool.clone());
        (pool, repo)
    }

    #[tokio::test]
    async fn test_crud_and_active_order() {
        let (_pool, repo) = setup_test_repo().await;

        let mut sensors = Feature::new("Soil sensors".to_string());
        sensors.order_index = 2;
        let sensors = repo.create(&sensors).await.expect("create");

        let mut advisory = Feature::new("Crop advisory".to_string());
        advisory.order_index = 1;
        advisory.icon = Some("fas fa-seedling".to_string());
        repo.create(&advisory).await.expect("create");

        let mut retired = Feature::new("Retired".to_string());
        retired.is_active = false;
        repo.create(&retired).await.expect("create");

        let titles: Vec<String> = repo
            .list_active()
            .await
            .expect("list")
            .into_iter()
            .map(|f| f.title)
            .collect();
        assert_eq!(titles, vec!["Crop advisory", "Soil sensors"]);
        assert_eq!(repo.list().await.expect("list").len(), 3);

        let mut edited = sensors.clone();
        edited.description = Some("Real-time moisture".to_string());
        repo.update(&edited).await.expect("update");
        let found = repo
            .get_by_id(sensors.id)
            .await
            .expect("query")
            .expect("missing");
        assert_eq!(found.description.as_deref(), Some("Real-time moisture"));

        assert!(repo.delete(sensors.id).await.expect("delete"));
        assert!(!repo.delete(sensors.id).await.expect("delete"));
    }
}
