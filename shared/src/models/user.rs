//! User account model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A crib user account (public view, no password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serializes_without_credentials() {
        let user = User {
            id: Uuid::new_v4(),
            email: "werker@example.com".to_string(),
            name: "Werker".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(&user).unwrap();
        let object = value.as_object().unwrap();

        assert!(object.contains_key("email"));
        assert!(object.contains_key("is_active"));
        assert!(!object.contains_key("password_hash"));
        assert!(!object.contains_key("password"));
    }
}
