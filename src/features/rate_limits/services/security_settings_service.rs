use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::rate_limits::models::{RateLimitingSettings, SecuritySetting};
use crate::features::rate_limits::stores::SecuritySettingsStore;
use crate::shared::constants::SETTING_RATE_LIMITING;

/// Admin access to the global security toggles
pub struct SecuritySettingsService {
    store: Arc<dyn SecuritySettingsStore>,
}

impl SecuritySettingsService {
    pub fn new(store: Arc<dyn SecuritySettingsStore>) -> Self {
        Self { store }
    }

    /// Current rate limiting setting, `None` when never configured
    pub async fn get_rate_limiting(&self) -> Result<Option<SecuritySetting>> {
        self.store.get(SETTING_RATE_LIMITING).await.map_err(|e| {
            tracing::error!("Failed to read rate limiting setting: {:?}", e);
            AppError::Internal(e.to_string())
        })
    }

    /// Turn rate limiting on or off
    pub async fn set_rate_limiting(
        &self,
        enabled: bool,
        updated_by: &str,
    ) -> Result<SecuritySetting> {
        let setting = self
            .store
            .set_rate_limiting(RateLimitingSettings { enabled }, updated_by)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update rate limiting setting: {:?}", e);
                AppError::Internal(e.to_string())
            })?;

        tracing::info!("Rate limiting set to {} by {}", enabled, updated_by);

        Ok(setting)
    }
}
