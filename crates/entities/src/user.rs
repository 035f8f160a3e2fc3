//! User-related entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user provisioned from a third-party login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: Uuid,
    /// Subject identifier issued by the OAuth2 provider. Unique per user.
    pub social_id: String,
    /// Display name.
    pub name: String,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user for a social identity.
    pub fn new(social_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            social_id: social_id.into(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("kakao-123", "Alice");

        assert_eq!(user.social_id, "kakao-123");
        assert_eq!(user.name, "Alice");
    }

    #[test]
    fn test_user_ids_are_unique() {
        let a = User::new("1", "A");
        let b = User::new("1", "A");
        assert_ne!(a.id, b.id);
    }
}
