//! Database layer
//!
//! SQLite storage for the CMS: connection pool, embedded migrations and one
//! repository per table.
//!
//! # Usage
//!
//! ```ignore
//! use shramic_cms::config::DatabaseConfig;
//! use shramic_cms::db::{create_pool, migrations};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! migrations::run_migrations(&pool).await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool, ping};
pub use sqlx::SqlitePool;
