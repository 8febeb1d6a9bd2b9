//! Settings repository
//!
//! Key/value site settings. A stored value may be NULL; callers decide what
//! default to show in that case.

use crate::models::Setting;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteExecutor, SqlitePool};
use std::collections::HashMap;
use std::sync::Arc;

/// Repository trait for settings operations
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Get a single setting by key
    async fn get(&self, key: &str) -> Result<Option<Setting>>;

    /// Get all settings ordered by key
    async fn get_all(&self) -> Result<Vec<Setting>>;

    /// Get values for the given keys; missing keys are absent from the map
    async fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, Option<String>>>;

    /// Insert or update one setting. `description` is only stored on insert.
    async fn set(&self, key: &str, value: Option<&str>, description: Option<&str>) -> Result<()>;

    /// Insert or update several settings in one transaction
    async fn set_many(&self, settings: &[(String, Option<String>)]) -> Result<()>;

    /// Count stored settings
    async fn count(&self) -> Result<i64>;

    /// Delete a setting. Returns whether a row was removed.
    async fn delete(&self, key: &str) -> Result<bool>;
}

/// SQLx-based settings repository
pub struct SqlxSettingsRepository {
    pool: SqlitePool,
}

impl SqlxSettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn SettingsRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl SettingsRepository for SqlxSettingsRepository {
    async fn get(&self, key: &str) -> Result<Option<Setting>> {
        let row = sqlx::query(
            "SELECT id, key, value, description, updated_at FROM settings WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get setting")?;

        row.as_ref().map(row_to_setting).transpose()
    }

    async fn get_all(&self) -> Result<Vec<Setting>> {
        let rows =
            sqlx::query("SELECT id, key, value, description, updated_at FROM settings ORDER BY key")
                .fetch_all(&self.pool)
                .await
                .context("Failed to list settings")?;

        rows.iter().map(row_to_setting).collect()
    }

    async fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, Option<String>>> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = vec!["?"; keys.len()].join(", ");
        let sql = format!(
            "SELECT key, value FROM settings WHERE key IN ({})",
            placeholders
        );
        let mut query = sqlx::query(&sql);
        for key in keys {
            query = query.bind(*key);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .context("Failed to get settings")?;

        Ok(rows
            .into_iter()
            .map(|r| (r.get("key"), r.get("value")))
            .collect())
    }

    async fn set(&self, key: &str, value: Option<&str>, description: Option<&str>) -> Result<()> {
        upsert_setting(&self.pool, key, value, description).await
    }

    async fn set_many(&self, settings: &[(String, Option<String>)]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin settings transaction")?;

        for (key, value) in settings {
            upsert_setting(&mut *tx, key, value.as_deref(), None).await?;
        }

        tx.commit()
            .await
            .context("Failed to commit settings transaction")?;
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        count_settings(&self.pool).await
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM settings WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .context("Failed to delete setting")?;

        Ok(result.rows_affected() > 0)
    }
}

pub(crate) async fn upsert_setting<'e, E>(
    executor: E,
    key: &str,
    value: Option<&str>,
    description: Option<&str>,
) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO settings (key, value, description, updated_at) VALUES (?, ?, ?, ?)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
    )
    .bind(key)
    .bind(value)
    .bind(description)
    .bind(Utc::now())
    .execute(executor)
    .await
    .with_context(|| format!("Failed to save setting '{}'", key))?;
    Ok(())
}

pub(crate) async fn count_settings<'e, E>(executor: E) -> Result<i64>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query("SELECT COUNT(*) as count FROM settings")
        .fetch_one(executor)
        .await
        .context("Failed to count settings")?;
    Ok(row.get("count"))
}

fn row_to_setting(row: &SqliteRow) -> Result<Setting> {
    Ok(Setting {
        id: row.get("id"),
        key: row.get("key"),
        value: row.get("value"),
        description: row.get("description"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> (SqlitePool, SqlxSettingsRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxSettingsRepository::new(pool.clone());
        (pool, repo)
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let (_pool, repo) = setup_test_repo().await;

        repo.set("site_title", Some("Shramic"), Some("Website title"))
            .await
            .expect("Failed to set");

        let setting = repo
            .get("site_title")
            .await
            .expect("Query failed")
            .expect("Setting not found");
        assert_eq!(setting.value.as_deref(), Some("Shramic"));
        assert_eq!(setting.description.as_deref(), Some("Website title"));
        assert!(repo.get("missing").await.expect("Query failed").is_none());
    }

    #[tokio::test]
    async fn test_set_updates_value_keeps_description() {
        let (_pool, repo) = setup_test_repo().await;

        repo.set("contact_email", Some("a@x.com"), Some("Contact email"))
            .await
            .expect("set");
        repo.set("contact_email", Some("b@x.com"), Some("Ignored"))
            .await
            .expect("set");

        let setting = repo.get("contact_email").await.expect("get").expect("missing");
        assert_eq!(setting.value.as_deref(), Some("b@x.com"));
        assert_eq!(setting.description.as_deref(), Some("Contact email"));
        assert_eq!(repo.count().await.expect("count"), 1);
    }

    #[tokio::test]
    async fn test_set_many_and_get_many() {
        let (_pool, repo) = setup_test_repo().await;

        let values = vec![
            ("site_title".to_string(), Some("Title".to_string())),
            ("site_tagline".to_string(), None),
        ];
        repo.set_many(&values).await.expect("Failed to set many");

        let map = repo
            .get_many(&["site_title", "site_tagline", "github_url"])
            .await
            .expect("Failed to get many");
        assert_eq!(map.get("site_title"), Some(&Some("Title".to_string())));
        assert_eq!(map.get("site_tagline"), Some(&None));
        assert!(!map.contains_key("github_url"));

        assert_eq!(repo.get_all().await.expect("all").len(), 2);
    }

    #[tokio::test]
    async fn test_delete() {
        let (_pool, repo) = setup_test_repo().await;
        repo.set("k", Some("v"), None).await.expect("set");

        assert!(repo.delete("k").await.expect("delete"));
        assert!(!repo.delete("k").await.expect("delete"));
    }
}
