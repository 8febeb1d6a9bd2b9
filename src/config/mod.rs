//! Configuration management
//!
//! This module handles loading and parsing configuration for the CMS.
//! Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Session cookie configuration
    #[serde(default)]
    pub session: SessionConfig,
    /// Upload configuration
    #[serde(default)]
    pub upload: UploadConfig,
    /// Template configuration
    #[serde(default)]
    pub templates: TemplatesConfig,
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Initial administrator account
    #[serde(default)]
    pub seed: SeedConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served under `/static`
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    10000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path or `sqlite:` URL
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "instance/cms.db".to_string()
}

/// Session cookie configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Signing key for session cookies. A random key is generated at
    /// startup when unset, so sessions do not survive a restart.
    #[serde(default)]
    pub secret_key: Option<String>,
    /// Cookie name
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Cookie lifetime in days
    #[serde(default = "default_max_age_days")]
    pub max_age_days: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            cookie_name: default_cookie_name(),
            max_age_days: default_max_age_days(),
        }
    }
}

fn default_cookie_name() -> String {
    "session".to_string()
}

fn default_max_age_days() -> i64 {
    31
}

/// Upload configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Upload directory path (created at startup)
    #[serde(default = "default_upload_path")]
    pub path: PathBuf,
    /// Maximum request body size in bytes (default: 16MB)
    #[serde(default = "default_max_content_length")]
    pub max_content_length: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            path: default_upload_path(),
            max_content_length: default_max_content_length(),
        }
    }
}

fn default_upload_path() -> PathBuf {
    PathBuf::from("static/uploads")
}

fn default_max_content_length() -> usize {
    16 * 1024 * 1024 // 16MB
}

/// Template configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplatesConfig {
    /// Directory whose `.html` files override the embedded templates
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache TTL in seconds
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl(),
        }
    }
}

fn default_ttl() -> u64 {
    300
}

/// Initial administrator created by the seed routine on an empty database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    #[serde(default = "default_admin_username")]
    pub admin_username: String,
    #[serde(default = "default_admin_email")]
    pub admin_email: String,
    /// Generated and logged once when unset
    #[serde(default)]
    pub admin_password: Option<String>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            admin_username: default_admin_username(),
            admin_email: default_admin_email(),
            admin_password: None,
        }
    }
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_email() -> String {
    "admin@shramic.com".to_string()
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError {
        path: String,
        message: String,
    },
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            }
        })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables:
    /// - SHRAMIC_SERVER_HOST
    /// - PORT, SHRAMIC_SERVER_PORT (the latter wins)
    /// - SHRAMIC_DATABASE_URL
    /// - SECRET_KEY, SHRAMIC_SECRET_KEY (the latter wins)
    /// - SHRAMIC_UPLOAD_PATH
    /// - SHRAMIC_TEMPLATES_PATH
    /// - SHRAMIC_CACHE_TTL_SECONDS
    /// - SHRAMIC_ADMIN_USERNAME, SHRAMIC_ADMIN_EMAIL, SHRAMIC_ADMIN_PASSWORD
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("SHRAMIC_SERVER_HOST") {
            self.server.host = host;
        }
        for var in ["PORT", "SHRAMIC_SERVER_PORT"] {
            if let Ok(port) = std::env::var(var) {
                if let Ok(port) = port.parse::<u16>() {
                    self.server.port = port;
                }
            }
        }

        if let Ok(url) = std::env::var("SHRAMIC_DATABASE_URL") {
            self.database.url = url;
        }

        for var in ["SECRET_KEY", "SHRAMIC_SECRET_KEY"] {
            if let Ok(key) = std::env::var(var) {
                if !key.is_empty() {
                    self.session.secret_key = Some(key);
                }
            }
        }

        if let Ok(path) = std::env::var("SHRAMIC_UPLOAD_PATH") {
            self.upload.path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("SHRAMIC_TEMPLATES_PATH") {
            self.templates.path = Some(PathBuf::from(path));
        }
        if let Ok(ttl) = std::env::var("SHRAMIC_CACHE_TTL_SECONDS") {
            if let Ok(ttl) = ttl.parse::<u64>() {
                self.cache.ttl_seconds = ttl;
            }
        }

        if let Ok(username) = std::env::var("SHRAMIC_ADMIN_USERNAME") {
            self.seed.admin_username = username;
        }
        if let Ok(email) = std::env::var("SHRAMIC_ADMIN_EMAIL") {
            self.seed.admin_email = email;
        }
        if let Ok(password) = std::env::var("SHRAMIC_ADMIN_PASSWORD") {
            if !password.is_empty() {
                self.seed.admin_password = Some(password);
            }
        }
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared by `tests` and `property_tests`; both mutate process environment.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
const ENV_VARS: &[&str] = &[
    "SHRAMIC_SERVER_HOST",
    "SHRAMIC_SERVER_PORT",
    "PORT",
    "SHRAMIC_DATABASE_URL",
    "SECRET_KEY",
    "SHRAMIC_SECRET_KEY",
    "SHRAMIC_UPLOAD_PATH",
    "SHRAMIC_TEMPLATES_PATH",
    "SHRAMIC_CACHE_TTL_SECONDS",
    "SHRAMIC_ADMIN_USERNAME",
    "SHRAMIC_ADMIN_EMAIL",
    "SHRAMIC_ADMIN_PASSWORD",
];

#[cfg(test)]
fn clear_env() {
    for var in ENV_VARS {
        std::env::remove_var(var);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        super::CONFIG_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let path = std::path::Path::new("nonexistent_config.yml");
        let config = Config::load(path).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 10000);
        assert_eq!(config.server.static_dir, PathBuf::from("static"));
        assert_eq!(config.database.url, "instance/cms.db");
        assert!(config.session.secret_key.is_none());
        assert_eq!(config.session.cookie_name, "session");
        assert_eq!(config.upload.path, PathBuf::from("static/uploads"));
        assert_eq!(config.upload.max_content_length, 16 * 1024 * 1024);
        assert!(config.templates.path.is_none());
        assert_eq!(config.cache.ttl_seconds, 300);
        assert_eq!(config.seed.admin_username, "admin");
        assert_eq!(config.seed.admin_email, "admin@shramic.com");
        assert!(config.seed.admin_password.is_none());
    }

    #[test]
    fn test_load_empty_file_returns_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "").unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 10000);
    }

    #[test]
    fn test_load_partial_config_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "server:\n  port: 3000\n").unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.url, "instance/cms.db");
    }

    #[test]
    fn test_load_full_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"
server:
  host: "127.0.0.1"
  port: 9000
  static_dir: "public"
database:
  url: "data/site.db"
session:
  secret_key: "s3cret"
  cookie_name: "cms_session"
  max_age_days: 7
upload:
  path: "public/uploads"
  max_content_length: 1024
templates:
  path: "custom_templates"
cache:
  ttl_seconds: 60
seed:
  admin_username: "owner"
  admin_email: "owner@example.com"
  admin_password: "changeme"
"#).unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.static_dir, PathBuf::from("public"));
        assert_eq!(config.database.url, "data/site.db");
        assert_eq!(config.session.secret_key.as_deref(), Some("s3cret"));
        assert_eq!(config.session.cookie_name, "cms_session");
        assert_eq!(config.session.max_age_days, 7);
        assert_eq!(config.upload.path, PathBuf::from("public/uploads"));
        assert_eq!(config.upload.max_content_length, 1024);
        assert_eq!(config.templates.path, Some(PathBuf::from("custom_templates")));
        assert_eq!(config.cache.ttl_seconds, 60);
        assert_eq!(config.seed.admin_username, "owner");
        assert_eq!(config.seed.admin_password.as_deref(), Some("changeme"));
    }

    #[test]
    fn test_load_invalid_yaml_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "server:\n  port: not_a_number\n").unwrap();

        let result = Config::load(file.path());

        assert!(result.is_err());
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("parse"));
    }

    #[test]
    fn test_load_malformed_yaml_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "server:\n  host: [invalid yaml").unwrap();

        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_env_override_server_config() {
        let _guard = lock_env();
        clear_env();

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "server:\n  host: \"0.0.0.0\"\n  port: 8080\n").unwrap();

        std::env::set_var("SHRAMIC_SERVER_HOST", "192.168.1.1");
        std::env::set_var("SHRAMIC_SERVER_PORT", "4000");

        let config = Config::load_with_env(file.path()).unwrap();

        assert_eq!(config.server.host, "192.168.1.1");
        assert_eq!(config.server.port, 4000);

        clear_env();
    }

    #[test]
    fn test_env_port_used_when_prefixed_port_absent() {
        let _guard = lock_env();
        clear_env();

        std::env::set_var("PORT", "5000");
        let config = Config::load_with_env(std::path::Path::new("nonexistent.yml")).unwrap();
        assert_eq!(config.server.port, 5000);

        std::env::set_var("SHRAMIC_SERVER_PORT", "6000");
        let config = Config::load_with_env(std::path::Path::new("nonexistent.yml")).unwrap();
        assert_eq!(config.server.port, 6000);

        clear_env();
    }

    #[test]
    fn test_env_override_invalid_port_ignored() {
        let _guard = lock_env();
        clear_env();

        std::env::set_var("SHRAMIC_SERVER_PORT", "not-a-port");
        let config = Config::load_with_env(std::path::Path::new("nonexistent.yml")).unwrap();
        assert_eq!(config.server.port, 10000);

        clear_env();
    }

    #[test]
    fn test_env_override_secret_key() {
        let _guard = lock_env();
        clear_env();

        std::env::set_var("SECRET_KEY", "from-secret-key");
        let config = Config::load_with_env(std::path::Path::new("nonexistent.yml")).unwrap();
        assert_eq!(config.session.secret_key.as_deref(), Some("from-secret-key"));

        std::env::set_var("SHRAMIC_SECRET_KEY", "from-prefixed");
        let config = Config::load_with_env(std::path::Path::new("nonexistent.yml")).unwrap();
        assert_eq!(config.session.secret_key.as_deref(), Some("from-prefixed"));

        clear_env();
    }

    #[test]
    fn test_env_override_seed_and_paths() {
        let _guard = lock_env();
        clear_env();

        std::env::set_var("SHRAMIC_DATABASE_URL", "/tmp/cms-test.db");
        std::env::set_var("SHRAMIC_TEMPLATES_PATH", "/srv/templates");
        std::env::set_var("SHRAMIC_ADMIN_USERNAME", "root");
        std::env::set_var("SHRAMIC_ADMIN_PASSWORD", "hunter22");

        let config = Config::load_with_env(std::path::Path::new("nonexistent.yml")).unwrap();
        assert_eq!(config.database.url, "/tmp/cms-test.db");
        assert_eq!(config.templates.path, Some(PathBuf::from("/srv/templates")));
        assert_eq!(config.seed.admin_username, "root");
        assert_eq!(config.seed.admin_password.as_deref(), Some("hunter22"));

        clear_env();
    }
}
