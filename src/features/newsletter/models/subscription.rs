use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::submissions::models::Locale;

/// Database model for a newsletter subscription
#[derive(Debug, Clone, FromRow)]
pub struct Subscription {
    pub id: Uuid,
    pub email: String,
    pub locale: Locale,
    pub created_at: DateTime<Utc>,
}

/// E-mail addresses are compared case-insensitively
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
