//! User model
//!
//! Administrator accounts. Every user has full access to the admin panel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An administrator account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Username (unique)
    pub username: String,
    /// Email address (unique)
    pub email: String,
    /// Password hash (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with the given parameters.
    ///
    /// Note: The password should already be hashed before calling this function.
    /// Use `services::password::hash_password()` to hash the password.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: 0, // Will be set by the database
            username,
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_new() {
        let user = User::new(
            "admin".to_string(),
            "admin@example.com".to_string(),
            "hash".to_string(),
        );
        assert_eq!(user.id, 0);
        assert_eq!(user.username, "admin");
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new(
            "admin".to_string(),
            "admin@example.com".to_string(),
            "secret_hash".to_string(),
        );
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret_hash"));
        assert!(!json.contains("password_hash"));
    }
}
