use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use sqlx::FromRow;

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Salted bcrypt hash; never serialized outward.
    #[serde(skip_serializing)]
    pub password: String,
    pub phone: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// Identity summary returned from register/login/profile-update.
    pub fn summary(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "email": self.email,
            "phone": self.phone,
            "role": self.role,
        })
    }

    /// Summary plus account metadata, returned from GET /profile.
    pub fn profile(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "email": self.email,
            "phone": self.phone,
            "role": self.role,
            "created_at": self.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: 1,
            name: "Someone".to_string(),
            email: "someone@example.com".to_string(),
            password: "$2b$12$secret-hash".to_string(),
            phone: None,
            role: ROLE_USER.to_string(),
            is_active: true,
            created_at: Utc.timestamp_opt(0, 0).unwrap(),
            updated_at: Utc.timestamp_opt(0, 0).unwrap(),
        };

        let as_json = serde_json::to_value(&user).unwrap();
        assert!(as_json.get("password").is_none());
        assert!(user.summary().get("password").is_none());
        assert!(user.profile().get("created_at").is_some());
    }
}
