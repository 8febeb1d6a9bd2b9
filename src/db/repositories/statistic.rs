//! Statistic repository

use crate::models::Statistic;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteExecutor, SqlitePool};
use std::sync::Arc;

/// Statistic repository trait
#[async_trait]
pub trait StatisticRepository: Send + Sync {
    async fn create(&self, stat: &Statistic) -> Result<Statistic>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Statistic>>;

    /// All statistics ordered by `order_index`
    async fn list(&self) -> Result<Vec<Statistic>>;

    /// Active statistics ordered by `order_index`
    async fn list_active(&self) -> Result<Vec<Statistic>>;

    async fn update(&self, stat: &Statistic) -> Result<Statistic>;

    /// Delete a statistic. Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool>;

    async fn count(&self) -> Result<i64>;
}

/// SQLx-based statistic repository implementation
pub struct SqlxStatisticRepository {
    pool: SqlitePool,
}

impl SqlxStatisticRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn StatisticRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl StatisticRepository for SqlxStatisticRepository {
    async fn create(&self, stat: &Statistic) -> Result<Statistic> {
        let id = insert_statistic(&self.pool, stat).await?;
        Ok(Statistic { id, ..stat.clone() })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Statistic>> {
        let row = sqlx::query(
            r#"
            SELECT id, label, value, suffix, icon, order_index, is_active
            FROM statistics
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get statistic by ID")?;

        row.as_ref().map(row_to_statistic).transpose()
    }

    async fn list(&self) -> Result<Vec<Statistic>> {
        let rows = sqlx::query(
            r#"
            SELECT id, label, value, suffix, icon, order_index, is_active
            FROM statistics
            ORDER BY order_index ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list statistics")?;

        rows.iter().map(row_to_statistic).collect()
    }

    async fn list_active(&self) -> Result<Vec<Statistic>> {
        let rows = sqlx::query(
            r#"
            SELECT id, label, value, suffix, icon, order_index, is_active
            FROM statistics
            WHERE is_active = 1
            ORDER BY order_index ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list active statistics")?;

        rows.iter().map(row_to_statistic).collect()
    }

    async fn update(&self, stat: &Statistic) -> Result<Statistic> {
        let result = sqlx::query(
            r#"
            UPDATE statistics
            SET label = ?, value = ?, suffix = ?, icon = ?, order_index = ?, is_active = ?
            WHERE id = ?
            "#,
        )
        .bind(&stat.label)
        .bind(&stat.value)
        .bind(&stat.suffix)
        .bind(&stat.icon)
        .bind(stat.order_index)
        .bind(stat.is_active)
        .bind(stat.id)
        .execute(&self.pool)
        .await
        .context("Failed to update statistic")?;

        if result.rows_affected() == 0 {
            anyhow::bail!("Statistic with id {} not found", stat.id);
        }

        Ok(stat.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM statistics WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete statistic")?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        count_statistics(&self.pool).await
    }
}

pub(crate) async fn insert_statistic<'e, E>(executor: E, stat: &Statistic) -> Result<i64>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO statistics (label, value, suffix, icon, order_index, is_active)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&stat.label)
    .bind(&stat.value)
    .bind(&stat.suffix)
    .bind(&stat.icon)
    .bind(stat.order_index)
    .bind(stat.is_active)
    .execute(executor)
    .await
    .context("Failed to create statistic")?;

    Ok(result.last_insert_rowid())
}

pub(crate) async fn count_statistics<'e, E>(executor: E) -> Result<i64>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query("SELECT COUNT(*) as count FROM statistics")
        .fetch_one(executor)
        .await
        .context("Failed to count statistics")?;
    Ok(row.get("count"))
}

fn row_to_statistic(row: &SqliteRow) -> Result<Statistic> {
    Ok(Statistic {
        id: row.get("id"),
        label: row.get("label"),
        value: row.get("value"),
        suffix: row.get("suffix"),
        icon: row.get("icon"),
        order_index: row.get("order_index"),
        is_active: row.get("is_active"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> (SqlitePool, SqlxStatisticRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxStatisticRepository::new(pool.clone());
        (pool, repo)
    }

    fn stat(label: &str, order: i64, active: bool) -> Statistic {
        let mut s = Statistic::new(label.to_string(), "50K".to_string());
        s.suffix = Some("+".to_string());
        s.order_index = order;
        s.is_active = active;
        s
    }

    #[tokio::test]
    async fn test_crud() {
        let (_pool, repo) = setup_test_repo().await;

        let mut created = repo.create(&stat("Farmers", 1, true)).await.expect("create");
        assert_eq!(repo.count().await.expect("count"), 1);

        created.value = "60K".to_string();
        repo.update(&created).await.expect("update");
        let found = repo
            .get_by_id(created.id)
            .await
            .expect("query")
            .expect("missing");
        assert_eq!(found.value, "60K");
        assert_eq!(found.suffix.as_deref(), Some("+"));

        assert!(repo.delete(created.id).await.expect("delete"));
        assert!(!repo.delete(created.id).await.expect("delete"));
    }

    #[tokio::test]
    async fn test_list_active_ordered() {
        let (_pool, repo) = setup_test_repo().await;
        repo.create(&stat("Third", 3, true)).await.expect("create");
        repo.create(&stat("First", 1, true)).await.expect("create");
        repo.create(&stat("Hidden", 2, false)).await.expect("create");

        let labels: Vec<String> = repo
            .list_active()
            .await
            .expect("list")
            .into_iter()
            .map(|s| s.label)
            .collect();
        assert_eq!(labels, vec!["First", "Third"]);
        assert_eq!(repo.list().await.expect("list").len(), 3);
    }

    #[tokio::test]
    async fn test_update_missing_fails() {
        let (_pool, repo) = setup_test_repo().await;
        let mut ghost = stat("Ghost", 0, true);
        ghost.id = 42;
        assert!(repo.update(&ghost).await.is_err());
    }
}
