//! User accounts
//!
//! A stored user carries an Argon2 password hash; everything handed back to
//! callers is a `UserProfile`, which never includes it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::UserId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Stored lowercased; unique across users
    pub email: String,
    /// PHC-format Argon2 hash
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>, email: &str, password_hash: String) -> Self {
        Self {
            id: UserId::new(),
            name: name.into().trim().to_string(),
            email: normalize_email(email),
            password_hash,
            created_at: Utc::now(),
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }
}

/// Public view of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_normalized() {
        let user = User::new("Jo", "  Jo@Example.COM ", "hash".into());
        assert_eq!(user.email, "jo@example.com");
    }

    #[test]
    fn test_profile_has_no_hash() {
        let user = User::new("Jo", "jo@example.com", "secret-hash".into());
        let json = serde_json::to_string(&user.profile()).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("jo@example.com"));
    }
}
