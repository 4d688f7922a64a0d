use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::rate_limits::models::SecuritySetting;

/// Response DTO for the rate limiting toggle
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitingSettingDto {
    pub enabled: bool,
    /// Absent when the setting has never been stored
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

impl From<SecuritySetting> for RateLimitingSettingDto {
    fn from(setting: SecuritySetting) -> Self {
        Self {
            enabled: setting.rate_limiting().enabled,
            updated_at: Some(setting.updated_at),
            updated_by: setting.updated_by,
        }
    }
}

impl RateLimitingSettingDto {
    pub fn unset() -> Self {
        Self {
            enabled: false,
            updated_at: None,
            updated_by: None,
        }
    }
}

/// Request DTO for toggling rate limiting
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateRateLimitingSettingDto {
    pub enabled: bool,
}
