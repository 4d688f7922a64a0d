use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of `security_settings`
#[derive(Debug, Clone, FromRow)]
pub struct SecuritySetting {
    pub setting_key: String,
    pub setting_value: serde_json::Value,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<String>,
}

/// Value stored under the `rate_limiting` key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RateLimitingSettings {
    #[serde(default)]
    pub enabled: bool,
}

impl SecuritySetting {
    /// Parse the `rate_limiting` payload; malformed values count as disabled
    pub fn rate_limiting(&self) -> RateLimitingSettings {
        serde_json::from_value(self.setting_value.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setting(value: serde_json::Value) -> SecuritySetting {
        SecuritySetting {
            setting_key: "rate_limiting".to_string(),
            setting_value: value,
            updated_at: Utc::now(),
            updated_by: None,
        }
    }

    #[test]
    fn test_rate_limiting_enabled() {
        let s = setting(serde_json::json!({ "enabled": true }));
        assert!(s.rate_limiting().enabled);
    }

    #[test]
    fn test_rate_limiting_missing_flag_is_disabled() {
        let s = setting(serde_json::json!({}));
        assert!(!s.rate_limiting().enabled);
    }

    #[test]
    fn test_rate_limiting_malformed_value_is_disabled() {
        let s = setting(serde_json::json!("yes"));
        assert!(!s.rate_limiting().enabled);
    }
}
