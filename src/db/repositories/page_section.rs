//! Page section repository
//!
//! Sections are addressed by `(page, section_name)`. Single-slot sections
//! (hero, story, ...) use the first row by `order_index`; repeating sections
//! (about cards, values) are listed in order.

use crate::models::PageSection;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

const SECTION_COLUMNS: &str = "id, page, section_name, title, content, image_url, video_url, \
     button_text, button_link, order_index, is_active, updated_at";

/// Page section repository trait
#[async_trait]
pub trait PageSectionRepository: Send + Sync {
    /// First section in the slot, active or not
    async fn get(&self, page: &str, section_name: &str) -> Result<Option<PageSection>>;

    /// First active section in the slot
    async fn get_active(&self, page: &str, section_name: &str) -> Result<Option<PageSection>>;

    /// All sections in the slot ordered by `order_index`
    async fn list(&self, page: &str, section_name: &str) -> Result<Vec<PageSection>>;

    /// Active sections in the slot ordered by `order_index`
    async fn list_active(&self, page: &str, section_name: &str) -> Result<Vec<PageSection>>;

    /// Insert the section when new, otherwise update it
    async fn save(&self, section: &PageSection) -> Result<PageSection>;

    /// Delete a section. Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based page section repository implementation
pub struct SqlxPageSectionRepository {
    pool: SqlitePool,
}

impl SqlxPageSectionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn PageSectionRepository> {
        Arc::new(Self::new(pool))
    }

    async fn fetch_first(
        &self,
        page: &str,
        section_name: &str,
        active_only: bool,
    ) -> Result<Option<PageSection>> {
        let sql = format!(
            "SELECT {} FROM page_sections WHERE page = ? AND section_name = ? {} \
             ORDER BY order_index ASC, id ASC LIMIT 1",
            SECTION_COLUMNS,
            if active_only { "AND is_active = 1" } else { "" }
        );

        let row = sqlx::query(&sql)
            .bind(page)
            .bind(section_name)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get page section")?;

        row.as_ref().map(row_to_section).transpose()
    }

    async fn fetch_all(
        &self,
        page: &str,
        section_name: &str,
        active_only: bool,
    ) -> Result<Vec<PageSection>> {
        let sql = format!(
            "SELECT {} FROM page_sections WHERE page = ? AND section_name = ? {} \
             ORDER BY order_index ASC, id ASC",
            SECTION_COLUMNS,
            if active_only { "AND is_active = 1" } else { "" }
        );

        let rows = sqlx::query(&sql)
            .bind(page)
            .bind(section_name)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list page sections")?;

        rows.iter().map(row_to_section).collect()
    }
}

#[async_trait]
impl PageSectionRepository for SqlxPageSectionRepository {
    async fn get(&self, page: &str, section_name: &str) -> Result<Option<PageSection>> {
        self.fetch_first(page, section_name, false).await
    }

    async fn get_active(&self, page: &str, section_name: &str) -> Result<Option<PageSection>> {
        self.fetch_first(page, section_name, true).await
    }

    async fn list(&self, page: &str, section_name: &str) -> Result<Vec<PageSection>> {
        self.fetch_all(page, section_name, false).await
    }

    async fn list_active(&self, page: &str, section_name: &str) -> Result<Vec<PageSection>> {
        self.fetch_all(page, section_name, true).await
    }

    async fn save(&self, section: &PageSection) -> Result<PageSection> {
        let now = Utc::now();

        if section.is_new() {
            let result = sqlx::query(
                r#"
                INSERT INTO page_sections (page, section_name, title, content, image_url, video_url,
                                           button_text, button_link, order_index, is_active, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&section.page)
            .bind(&section.section_name)
            .bind(&section.title)
            .bind(&section.content)
            .bind(&section.image_url)
            .bind(&section.video_url)
            .bind(&section.button_text)
            .bind(&section.button_link)
            .bind(section.order_index)
            .bind(section.is_active)
            .bind(now)
            .execute(&self.pool)
            .await
            .context("Failed to create page section")?;

            return Ok(PageSection {
                id: result.last_insert_rowid(),
                updated_at: now,
                ..section.clone()
            });
        }

        let result = sqlx::query(
            r#"
            UPDATE page_sections
            SET page = ?, section_name = ?, title = ?, content = ?, image_url = ?, video_url = ?,
                button_text = ?, button_link = ?, order_index = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&section.page)
        .bind(&section.section_name)
        .bind(&section.title)
        .bind(&section.content)
        .bind(&section.image_url)
        .bind(&section.video_url)
        .bind(&section.button_text)
        .bind(&section.button_link)
        .bind(section.order_index)
        .bind(section.is_active)
        .bind(now)
        .bind(section.id)
        .execute(&self.pool)
        .await
        .context("Failed to update page section")?;

        if result.rows_affected() == 0 {
            anyhow::bail!("Page section with id {} not found", section.id);
        }

        Ok(PageSection {
            updated_at: now,
            ..section.clone()
        })
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM page_sections WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete page section")?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_section(row: &SqliteRow) -> Result<PageSection> {
    Ok(PageSection {
        id: row.get("id"),
        page: row.get("page"),
        section_name: row.get("section_name"),
        title: row.get("title"),
        content: row.get("content"),
        image_url: row.get("image_url"),
        video_url: row.get("video_url"),
        button_text: row.get("button_text"),
        button_link: row.get("button_link"),
        order_index: row.get("order_index"),
        is_active: row.get("is_active"),
        updated_at: row.get("updated_at"),
    })
}
