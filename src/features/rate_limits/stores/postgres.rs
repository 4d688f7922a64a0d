use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{RateLimitStore, SecuritySettingsStore, StoreError};
use crate::features::rate_limits::models::{
    RateLimitRecord, RateLimitingSettings, SecuritySetting,
};
use crate::shared::constants::SETTING_RATE_LIMITING;

/// `rate_limit_tracking` backed by PostgreSQL
pub struct PgRateLimitStore {
    pool: PgPool,
}

impl PgRateLimitStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RateLimitStore for PgRateLimitStore {
    async fn find_active(
        &self,
        identifier: &str,
        endpoint: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<RateLimitRecord>, StoreError> {
        let record = sqlx::query_as::<_, RateLimitRecord>(
            r#"
            SELECT id, identifier, endpoint, window_start, request_count
            FROM rate_limit_tracking
            WHERE identifier = $1
              AND endpoint = $2
              AND window_start >= $3
            ORDER BY window_start DESC
            LIMIT 1
            "#,
        )
        .bind(identifier)
        .bind(endpoint)
        .bind(since)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn insert_window(
        &self,
        identifier: &str,
        endpoint: &str,
        window_start: DateTime<Utc>,
    ) -> Result<RateLimitRecord, StoreError> {
        let record = sqlx::query_as::<_, RateLimitRecord>(
            r#"
            INSERT INTO rate_limit_tracking (identifier, endpoint, window_start, request_count)
            VALUES ($1, $2, $3, 1)
            RETURNING id, identifier, endpoint, window_start, request_count
            "#,
        )
        .bind(identifier)
        .bind(endpoint)
        .bind(window_start)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn increment_below(
        &self,
        record: &RateLimitRecord,
        max_requests: i32,
    ) -> Result<Option<i32>, StoreError> {
        // The limit is part of the predicate so concurrent increments cannot overshoot it
        let count = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE rate_limit_tracking
            SET request_count = request_count + 1
            WHERE id = $1 AND request_count < $2
            RETURNING request_count
            "#,
        )
        .bind(record.id)
        .bind(max_requests)
        .fetch_optional(&self.pool)
        .await?;

        Ok(count)
    }

    async fn purge_before(&self, before: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM rate_limit_tracking WHERE window_start < $1")
            .bind(before)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// `security_settings` backed by PostgreSQL
pub struct PgSecuritySettingsStore {
    pool: PgPool,
}

impl PgSecuritySettingsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SecuritySettingsStore for PgSecuritySettingsStore {
    async fn get(&self, key: &str) -> Result<Option<SecuritySetting>, StoreError> {
        let setting = sqlx::query_as::<_, SecuritySetting>(
            r#"
            SELECT setting_key, setting_value, updated_at, updated_by
            FROM security_settings
            WHERE setting_key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(setting)
    }

    async fn set_rate_limiting(
        &self,
        settings: RateLimitingSettings,
        updated_by: &str,
    ) -> Result<SecuritySetting, StoreError> {
        let value = serde_json::to_value(settings)
            .map_err(|e| StoreError::Unavailable(format!("Failed to encode setting: {}", e)))?;

        let setting = sqlx::query_as::<_, SecuritySetting>(
            r#"
            INSERT INTO security_settings (setting_key, setting_value, updated_at, updated_by)
            VALUES ($1, $2, NOW(), $3)
            ON CONFLICT (setting_key) DO UPDATE
            SET setting_value = EXCLUDED.setting_value,
                updated_at = NOW(),
                updated_by = EXCLUDED.updated_by
            RETURNING setting_key, setting_value, updated_at, updated_by
            "#,
        )
        .bind(SETTING_RATE_LIMITING)
        .bind(value)
        .bind(updated_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(setting)
    }
}
