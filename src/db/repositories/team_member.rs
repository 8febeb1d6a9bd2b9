//! Team member repository

use crate::models::TeamMember;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

const MEMBER_COLUMNS: &str = "id, name, position, bio, photo_url, email, linkedin, twitter, \
     order_index, is_leadership, is_active, created_at";

/// Team member repository trait
#[async_trait]
pub trait TeamMemberRepository: Send + Sync {
    async fn create(&self, member: &TeamMember) -> Result<TeamMember>;

    async fn get_by_id(&self, id: i64) -> Result<Option<TeamMember>>;

    /// All members ordered by `order_index`
    async fn list(&self) -> Result<Vec<TeamMember>>;

    /// Active members in the leadership or regular group, ordered
    async fn list_active(&self, leadership: bool) -> Result<Vec<TeamMember>>;

    async fn update(&self, member: &TeamMember) -> Result<TeamMember>;

    /// Delete a member. Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool>;

    async fn count_active(&self) -> Result<i64>;
}

/// SQLx-based team member repository implementation
pub struct SqlxTeamMemberRepository {
    pool: SqlitePool,
}

impl SqlxTeamMemberRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn TeamMemberRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl TeamMemberRepository for SqlxTeamMemberRepository {
    async fn create(&self, member: &TeamMember) -> Result<TeamMember> {
        let result = sqlx::query(
            r#"
            INSERT INTO team_members (name, position, bio, photo_url, email, linkedin, twitter,
                                      order_index, is_leadership, is_active, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&member.name)
        .bind(&member.position)
        .bind(&member.bio)
        .bind(&member.photo_url)
        .bind(&member.email)
        .bind(&member.linkedin)
        .bind(&member.twitter)
        .bind(member.order_index)
        .bind(member.is_leadership)
        .bind(member.is_active)
        .bind(member.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to create team member")?;

        Ok(TeamMember {
            id: result.last_insert_rowid(),
            ..member.clone()
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<TeamMember>> {
        let sql = format!("SELECT {} FROM team_members WHERE id = ?", MEMBER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get team member by ID")?;

        row.as_ref().map(row_to_member).transpose()
    }

    async fn list(&self) -> Result<Vec<TeamMember>> {
        let sql = format!(
            "SELECT {} FROM team_members ORDER BY order_index ASC, id ASC",
            MEMBER_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list team members")?;

        rows.iter().map(row_to_member).collect()
    }

    async fn list_active(&self, leadership: bool) -> Result<Vec<TeamMember>> {
        let sql = format!(
            "SELECT {} FROM team_members WHERE is_active = 1 AND is_leadership = ? \
             ORDER BY order_index ASC, id ASC",
            MEMBER_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(leadership)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list active team members")?;

        rows.iter().map(row_to_member).collect()
    }

    async fn update(&self, member: &TeamMember) -> Result<TeamMember> {
        let result = sqlx::query(
            r#"
            UPDATE team_members
            SET name = ?, position = ?, bio = ?, photo_url = ?, email = ?, linkedin = ?,
                twitter = ?, order_index = ?, is_leadership = ?, is_active = ?
            WHERE id = ?
            "#,
        )
        .bind(&member.name)
        .bind(&member.position)
        .bind(&member.bio)
        .bind(&member.photo_url)
        .bind(&member.email)
        .bind(&member.linkedin)
        .bind(&member.twitter)
        .bind(member.order_index)
        .bind(member.is_leadership)
        .bind(member.is_active)
        .bind(member.id)
        .execute(&self.pool)
        .await
        .context("Failed to update team member")?;

        if result.rows_affected() == 0 {
            anyhow::bail!("Team member with id {} not found", member.id);
        }

        Ok(member.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM team_members WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete team member")?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_active(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM team_members WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count team members")?;
        Ok(row.get("count"))
    }
}

fn row_to_member(row: &SqliteRow) -> Result<TeamMember> {
    Ok(TeamMember {
        id: row.get("id"),
        name: row.get("name"),
        position: row.get("position"),
        bio: row.get("bio"),
        photo_url: row.get("photo_url"),
        email: row.get("email"),
        linkedin: row.get("linkedin"),
        twitter: row.get("twitter"),
        order_index: row.get("order_index"),
        is_leadership: row.get("is_leadership"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> (SqlitePool, SqlxTeamMemberRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxTeamMemberRepository::new(pool.clone());
        (pool, repo)
    }

    fn member(name: &str, leadership: bool, order: i64) -> TeamMember {
        let mut m = TeamMember::new(name.to_string(), "Engineer".to_string());
        m.is_leadership = leadership;
        m.order_index = order;
        m
    }

    #[tokio::test]
    async fn test_list_active_splits_leadership() {
        let (_pool, repo) = setup_test_repo().await;

        repo.create(&member("Founder", true, 0)).await.expect("create");
        repo.create(&member("Dev B", false, 2)).await.expect("create");
        repo.create(&member("Dev A", false, 1)).await.expect("create");
        let mut gone = member("Former", false, 0);
        gone.is_active = false;
        repo.create(&gone).await.expect("create");

        let leaders = repo.list_active(true).await.expect("list");
        assert_eq!(leaders.len(), 1);
        assert_eq!(leaders[0].name, "Founder");

        let team: Vec<String> = repo
            .list_active(false)
            .await
            .expect("list")
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(team, vec!["Dev A", "Dev B"]);

        assert_eq!(repo.count_active().await.expect("count"), 3);
        assert_eq!(repo.list().await.expect("list").len(), 4);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (_pool, repo) = setup_test_repo().await;
        let mut m = repo.create(&member("Meera", false, 0)).await.expect("create");

        m.linkedin = Some("https://linkedin.com/in/meera".to_string());
        m.is_leadership = true;
        repo.update(&m).await.expect("update");

        let found = repo.get_by_id(m.id).await.expect("query").expect("missing");
        assert!(found.is_leadership);
        assert_eq!(found.linkedin, m.linkedin);

        assert!(repo.delete(m.id).await.expect("delete"));
        assert!(!repo.delete(m.id).await.expect("delete"));
    }
}
