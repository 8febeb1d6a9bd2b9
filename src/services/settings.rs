//! Settings service
//!
//! The ten site settings shown in every page header and footer. Reads go
//! through the in-memory cache; any write drops the cached copy.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::cache::{CacheLayer, MemoryCache};
use crate::db::repositories::SettingsRepository;

/// Known setting keys
pub mod keys {
    pub const SITE_TITLE: &str = "site_title";
    pub const SITE_TAGLINE: &str = "site_tagline";
    pub const CONTACT_EMAIL: &str = "contact_email";
    pub const CONTACT_PHONE: &str = "contact_phone";
    pub const CONTACT_ADDRESS: &str = "contact_address";
    pub const FACEBOOK_URL: &str = "facebook_url";
    pub const TWITTER_URL: &str = "twitter_url";
    pub const LINKEDIN_URL: &str = "linkedin_url";
    pub const INSTAGRAM_URL: &str = "instagram_url";
    pub const GITHUB_URL: &str = "github_url";

    /// Every key editable from the admin settings page, in form order
    pub const ALL: [&str; 10] = [
        SITE_TITLE,
        SITE_TAGLINE,
        CONTACT_EMAIL,
        CONTACT_PHONE,
        CONTACT_ADDRESS,
        FACEBOOK_URL,
        TWITTER_URL,
        LINKEDIN_URL,
        INSTAGRAM_URL,
        GITHUB_URL,
    ];
}

const SITE_CACHE_KEY: &str = "settings:site";
const CACHE_PREFIX: &str = "settings:";

pub const DEFAULT_SITE_TITLE: &str = "Shramic Networks";
pub const DEFAULT_SITE_TAGLINE: &str = "Empowering Agriculture Through Innovation";

/// Site settings injected into every template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteSettings {
    pub site_title: String,
    pub site_tagline: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub contact_address: String,
    pub facebook_url: String,
    pub twitter_url: String,
    pub linkedin_url: String,
    pub instagram_url: String,
    pub github_url: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_title: DEFAULT_SITE_TITLE.to_string(),
            site_tagline: DEFAULT_SITE_TAGLINE.to_string(),
            ..Self::blank()
        }
    }
}

impl SiteSettings {
    /// All fields empty
    pub fn blank() -> Self {
        Self {
            site_title: String::new(),
            site_tagline: String::new(),
            contact_email: String::new(),
            contact_phone: String::new(),
            contact_address: String::new(),
            facebook_url: String::new(),
            twitter_url: String::new(),
            linkedin_url: String::new(),
            instagram_url: String::new(),
            github_url: String::new(),
        }
    }

    /// Blank settings with `values` filled in, for re-showing a submitted form
    pub fn from_values(values: &[(String, Option<String>)]) -> Self {
        let stored: HashMap<String, Option<String>> = values.iter().cloned().collect();
        Self::blank().overlay(&stored)
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut String> {
        let field = match key {
            keys::SITE_TITLE => &mut self.site_title,
            keys::SITE_TAGLINE => &mut self.site_tagline,
            keys::CONTACT_EMAIL => &mut self.contact_email,
            keys::CONTACT_PHONE => &mut self.contact_phone,
            keys::CONTACT_ADDRESS => &mut self.contact_address,
            keys::FACEBOOK_URL => &mut self.facebook_url,
            keys::TWITTER_URL => &mut self.twitter_url,
            keys::LINKEDIN_URL => &mut self.linkedin_url,
            keys::INSTAGRAM_URL => &mut self.instagram_url,
            keys::GITHUB_URL => &mut self.github_url,
            _ => return None,
        };
        Some(field)
    }

    /// Overlay stored values; NULL or missing rows keep the current value.
    fn overlay(mut self, stored: &HashMap<String, Option<String>>) -> Self {
        for key in keys::ALL {
            if let Some(Some(value)) = stored.get(key) {
                if let Some(field) = self.field_mut(key) {
                    *field = value.clone();
                }
            }
        }
        self
    }
}

/// Settings service errors
#[derive(Debug, Error)]
pub enum SettingsServiceError {
    #[error("Failed to load settings: {0}")]
    LoadError(String),

    #[error("Failed to save settings: {0}")]
    SaveError(String),

    #[error("Invalid setting key: {0}")]
    InvalidKey(String),
}

/// Settings service for managing site configuration
pub struct SettingsService {
    repo: Arc<dyn SettingsRepository>,
    cache: Arc<MemoryCache>,
}

impl SettingsService {
    pub fn new(repo: Arc<dyn SettingsRepository>, cache: Arc<MemoryCache>) -> Self {
        Self { repo, cache }
    }

    /// Value of `key`, or `default` when the row is missing or NULL
    pub async fn get(&self, key: &str, default: &str) -> Result<String, SettingsServiceError> {
        let setting = self
            .repo
            .get(key)
            .await
            .map_err(|e| SettingsServiceError::LoadError(format!("{:#}", e)))?;

        Ok(setting
            .and_then(|s| s.value)
            .unwrap_or_else(|| default.to_string()))
    }

    /// Insert or update one setting
    pub async fn update(
        &self,
        key: &str,
        value: Option<&str>,
        description: Option<&str>,
    ) -> Result<(), SettingsServiceError> {
        self.repo
            .set(key, value, description)
            .await
            .map_err(|e| SettingsServiceError::SaveError(format!("{:#}", e)))?;
        self.invalidate().await;
        Ok(())
    }

    /// Save the admin settings form in one transaction.
    ///
    /// Only the known site keys are accepted.
    pub async fn update_many(
        &self,
        values: &[(String, Option<String>)],
    ) -> Result<(), SettingsServiceError> {
        if let Some((key, _)) = values.iter().find(|(k, _)| !keys::ALL.contains(&k.as_str())) {
            return Err(SettingsServiceError::InvalidKey(key.clone()));
        }

        self.repo
            .set_many(values)
            .await
            .map_err(|e| SettingsServiceError::SaveError(format!("{:#}", e)))?;
        self.invalidate().await;
        Ok(())
    }

    /// Settings for template injection, with site defaults filled in.
    pub async fn site_context(&self) -> Result<SiteSettings, SettingsServiceError> {
        if let Ok(Some(cached)) = self.cache.get::<SiteSettings>(SITE_CACHE_KEY).await {
            return Ok(cached);
        }

        let stored = self.load_stored().await?;
        let settings = SiteSettings::default().overlay(&stored);

        if let Err(e) = self.cache.set(SITE_CACHE_KEY, &settings).await {
            tracing::warn!("Failed to cache site settings: {}", e);
        }
        Ok(settings)
    }

    /// Current values for the admin form; unset keys are empty.
    pub async fn admin_form(&self) -> Result<SiteSettings, SettingsServiceError> {
        let stored = self.load_stored().await?;
        Ok(SiteSettings::blank().overlay(&stored))
    }

    async fn load_stored(&self) -> Result<HashMap<String, Option<String>>, SettingsServiceError> {
        self.repo
            .get_many(&keys::ALL)
            .await
            .map_err(|e| SettingsServiceError::LoadError(format!("{:#}", e)))
    }

    async fn invalidate(&self) {
        if let Err(e) = self.cache.delete_prefix(CACHE_PREFIX).await {
            tracing::warn!("Failed to invalidate settings cache: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxSettingsRepository;
    use crate::db::{create_test_pool, migrations};

    async fn setup_service() -> SettingsService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SettingsService::new(
            SqlxSettingsRepository::boxed(pool),
            Arc::new(MemoryCache::new()),
        )
    }

    #[tokio::test]
    async fn test_get_falls_back_to_default() {
        let service = setup_service().await;
        assert_eq!(service.get("missing", "fallback").await.unwrap(), "fallback");

        service.update("nullable", None, None).await.unwrap();
        assert_eq!(service.get("nullable", "fallback").await.unwrap(), "fallback");

        service.update("present", Some("value"), None).await.unwrap();
        assert_eq!(service.get("present", "fallback").await.unwrap(), "value");
    }

    #[tokio::test]
    async fn test_site_context_defaults() {
        let service = setup_service().await;
        let ctx = service.site_context().await.unwrap();

        assert_eq!(ctx.site_title, "Shramic Networks");
        assert_eq!(ctx.site_tagline, "Empowering Agriculture Through Innovation");
        assert_eq!(ctx.contact_email, "");
    }

    #[tokio::test]
    async fn test_update_many_invalidates_cache() {
        let service = setup_service().await;
        assert_eq!(service.site_context().await.unwrap().site_title, "Shramic Networks");

        service
            .update_many(&[
                ("site_title".to_string(), Some("Krishi Hub".to_string())),
                ("github_url".to_string(), Some("https://github.com/krishi".to_string())),
            ])
            .await
            .unwrap();

        let ctx = service.site_context().await.unwrap();
        assert_eq!(ctx.site_title, "Krishi Hub");
        assert_eq!(ctx.github_url, "https://github.com/krishi");
    }

    #[tokio::test]
    async fn test_update_many_rejects_unknown_key() {
        let service = setup_service().await;
        let result = service
            .update_many(&[("admin_password".to_string(), Some("x".to_string()))])
            .await;
        assert!(matches!(result, Err(SettingsServiceError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_admin_form_blank_when_unset() {
        let service = setup_service().await;
        service
            .update("contact_phone", Some("+91 98765 43210"), None)
            .await
            .unwrap();

        let form = service.admin_form().await.unwrap();
        assert_eq!(form.site_title, "");
        assert_eq!(form.contact_phone, "+91 98765 43210");
    }

    #[test]
    fn test_overlay_skips_nulls() {
        let mut stored = HashMap::new();
        stored.insert("site_title".to_string(), None);
        stored.insert("site_tagline".to_string(), Some("Grow".to_string()));

        let settings = SiteSettings::default().overlay(&stored);
        assert_eq!(settings.site_title, "Shramic Networks");
        assert_eq!(settings.site_tagline, "Grow");
    }
}
