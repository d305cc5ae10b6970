use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ContactForm {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Bare phone-number lead, kept separately for the admin lead list.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PhoneContact {
    pub id: i64,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}
