//! Default data for a fresh database
//!
//! Each group (admin user, site settings, blog categories, statistics) is
//! inserted only when its table is empty, so running the seed again is a
//! no-op. Everything happens in a single transaction.

use anyhow::{Context, Result};
use data_encoding::HEXLOWER;
use sqlx::SqlitePool;

use crate::config::SeedConfig;
use crate::db::repositories::blog_category::{count_categories, insert_category};
use crate::db::repositories::settings::{count_settings, upsert_setting};
use crate::db::repositories::statistic::{count_statistics, insert_statistic};
use crate::db::repositories::user::{count_users, insert_user};
use crate::models::{BlogCategory, Statistic, User};
use crate::services::password::hash_password;

/// (key, value, description)
const DEFAULT_SETTINGS: [(&str, &str, &str); 10] = [
    ("site_title", "Shramic Networks", "Website title"),
    (
        "site_tagline",
        "Empowering Agriculture Through Innovation",
        "Website tagline",
    ),
    ("contact_email", "shramicnetworks@gmail.com", "Contact email"),
    ("contact_phone", "+91 98765 43210", "Contact phone"),
    ("contact_address", "Bengaluru, Karnataka, India", "Contact address"),
    ("facebook_url", "#", "Facebook URL"),
    ("twitter_url", "#", "Twitter URL"),
    ("linkedin_url", "#", "LinkedIn URL"),
    (
        "instagram_url",
        "https://www.instagram.com/shramic.info",
        "Instagram URL",
    ),
    (
        "github_url",
        "https://github.com/Amit-Ashok-Swain",
        "GitHub URL",
    ),
];

/// (name, slug, description)
const DEFAULT_CATEGORIES: [(&str, &str, &str); 4] = [
    (
        "Technology",
        "technology",
        "Agricultural technology and innovation",
    ),
    ("Sustainability", "sustainability", "Sustainable farming practices"),
    ("Training", "training", "Farmer training and education"),
    ("Market", "market", "Market insights and trends"),
];

/// (label, value, suffix, icon, order)
const DEFAULT_STATISTICS: [(&str, &str, &str, &str, i64); 4] = [
    ("Farmers Empowered", "50K", "+", "fas fa-users", 1),
    ("Average Yield Increase", "40", "%", "fas fa-chart-line", 2),
    (
        "Additional Income Generated",
        "₹2.5",
        "Cr",
        "fas fa-rupee-sign",
        3,
    ),
    ("Satisfaction Rate", "95", "%", "fas fa-smile", 4),
];

/// What a seed run inserted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedReport {
    pub admin_created: bool,
    /// Set when the admin was created with a generated password
    pub generated_password: Option<String>,
    pub settings_created: usize,
    pub categories_created: usize,
    pub statistics_created: usize,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        !self.admin_created
            && self.settings_created == 0
            && self.categories_created == 0
            && self.statistics_created == 0
    }
}

/// Populate empty tables with the default rows.
pub async fn seed_defaults(pool: &SqlitePool, config: &SeedConfig) -> Result<SeedReport> {
    let mut report = SeedReport::default();
    let mut tx = pool.begin().await.context("Failed to begin seed transaction")?;

    if count_users(&mut *tx).await? == 0 {
        let (password, generated) = match config.admin_password.as_deref() {
            Some(p) if !p.is_empty() => (p.to_string(), false),
            _ => (generate_password()?, true),
        };
        let hash = hash_password(&password)?;
        let admin = User::new(
            config.admin_username.clone(),
            config.admin_email.clone(),
            hash,
        );
        insert_user(&mut *tx, &admin).await?;

        report.admin_created = true;
        if generated {
            report.generated_password = Some(password);
        }
    }

    if count_settings(&mut *tx).await? == 0 {
        for (key, value, description) in DEFAULT_SETTINGS {
            upsert_setting(&mut *tx, key, Some(value), Some(description)).await?;
        }
        report.settings_created = DEFAULT_SETTINGS.len();
    }

    if count_categories(&mut *tx).await? == 0 {
        for (name, slug, description) in DEFAULT_CATEGORIES {
            let category = BlogCategory::new(
                name.to_string(),
                slug.to_string(),
                Some(description.to_string()),
            );
            insert_category(&mut *tx, &category).await?;
        }
        report.categories_created = DEFAULT_CATEGORIES.len();
    }

    if count_statistics(&mut *tx).await? == 0 {
        for (label, value, suffix, icon, order_index) in DEFAULT_STATISTICS {
            let mut stat = Statistic::new(label.to_string(), value.to_string());
            stat.suffix = Some(suffix.to_string());
            stat.icon = Some(icon.to_string());
            stat.order_index = order_index;
            insert_statistic(&mut *tx, &stat).await?;
        }
        report.statistics_created = DEFAULT_STATISTICS.len();
    }

    tx.commit().await.context("Failed to commit seed data")?;
    Ok(report)
}

/// 16 random bytes, hex encoded
fn generate_password() -> Result<String> {
    let mut bytes = [0u8; 16];
    getrandom::fill(&mut bytes)
        .map_err(|e| anyhow::anyhow!("Failed to generate admin password: {}", e))?;
    Ok(HEXLOWER.encode(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        BlogCategoryRepository, SettingsRepository, SqlxBlogCategoryRepository,
        SqlxSettingsRepository, SqlxStatisticRepository, SqlxUserRepository,
        StatisticRepository, UserRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::services::password::verify_password;

    async fn setup_pool() -> SqlitePool {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        pool
    }

    fn config_with_password(password: Option<&str>) -> SeedConfig {
        SeedConfig {
            admin_password: password.map(String::from),
            ..SeedConfig::default()
        }
    }

    #[tokio::test]
    async fn test_seed_populates_empty_database() {
        let pool = setup_pool().await;
        let report = seed_defaults(&pool, &config_with_password(Some("rotate-me")))
            .await
            .expect("Failed to seed");

        assert!(report.admin_created);
        assert_eq!(report.generated_password, None);
        assert_eq!(report.settings_created, 10);
        assert_eq!(report.categories_created, 4);
        assert_eq!(report.statistics_created, 4);

        let admin = SqlxUserRepository::new(pool.clone())
            .get_by_username("admin")
            .await
            .unwrap()
            .expect("admin should exist");
        assert_eq!(admin.email, "admin@shramic.com");
        assert!(verify_password("rotate-me", &admin.password_hash).unwrap());

        let settings = SqlxSettingsRepository::new(pool.clone());
        let title = settings.get("site_title").await.unwrap().expect("site_title");
        assert_eq!(title.value.as_deref(), Some("Shramic Networks"));
        assert_eq!(title.description.as_deref(), Some("Website title"));

        let stats = SqlxStatisticRepository::new(pool.clone()).list().await.unwrap();
        assert_eq!(stats[0].label, "Farmers Empowered");
        assert_eq!(stats[2].value, "₹2.5");
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let pool = setup_pool().await;
        let config = config_with_password(None);

        let first = seed_defaults(&pool, &config).await.expect("first seed");
        assert!(first.admin_created);
        let password = first.generated_password.expect("generated password");
        assert_eq!(password.len(), 32);

        let second = seed_defaults(&pool, &config).await.expect("second seed");
        assert!(second.is_empty());

        assert_eq!(SqlxUserRepository::new(pool.clone()).count().await.unwrap(), 1);
        assert_eq!(SqlxSettingsRepository::new(pool.clone()).count().await.unwrap(), 10);
        assert_eq!(
            SqlxBlogCategoryRepository::new(pool.clone()).count().await.unwrap(),
            4
        );
        assert_eq!(SqlxStatisticRepository::new(pool).count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_seed_skips_non_empty_groups() {
        let pool = setup_pool().await;
        SqlxSettingsRepository::new(pool.clone())
            .set("site_title", Some("Custom"), None)
            .await
            .unwrap();

        let report = seed_defaults(&pool, &config_with_password(Some("pw")))
            .await
            .unwrap();
        assert_eq!(report.settings_created, 0);
        assert_eq!(report.categories_created, 4);

        let title = SqlxSettingsRepository::new(pool)
            .get("site_title")
            .await
            .unwrap()
            .and_then(|s| s.value);
        assert_eq!(title.as_deref(), Some("Custom"));
    }
}
