use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::newsletter::models::Subscription;
use crate::features::submissions::models::Locale;

/// Request DTO for subscribing to the newsletter
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubscribeDto {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[serde(default)]
    pub locale: Locale,
}

/// Response DTO for a subscription
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponseDto {
    pub id: Uuid,
    pub email: String,
    pub locale: Locale,
    pub created_at: DateTime<Utc>,
}

impl From<Subscription> for SubscriptionResponseDto {
    fn from(s: Subscription) -> Self {
        Self {
            id: s.id,
            email: s.email,
            locale: s.locale,
            created_at: s.created_at,
        }
    }
}
