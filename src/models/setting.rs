//! Site setting model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A key/value row in the settings table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Setting {
    pub id: i64,
    pub key: String,
    pub value: Option<String>,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}
