use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum UserRole {
    Normal,
    Root,
}

/// Admin user. The password hash lives in `UserWithPassword` and is only
/// touched by the credential-aware repository operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User including the credential secret, for authentication contexts only.
/// The hash is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserWithPassword {
    pub id: i64,
    pub email: String,
    pub role: UserRole,
    #[serde(skip)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserWithPassword {
    /// Drop the credential, leaving the serializable user record.
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            email: self.email,
            role: self.role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::json!(UserRole::Root), serde_json::json!("root"));
        assert_eq!(
            serde_json::json!(UserRole::Normal),
            serde_json::json!("normal")
        );
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let user = UserWithPassword {
            id: 1,
            email: "admin@example.edu".into(),
            role: UserRole::Root,
            password_hash: "secret-hash".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("password_hash"));
    }
}
