//! Persistence ports of the rate limiter.
//!
//! The limiter only talks to these traits so the check logic can run against
//! PostgreSQL in production and against in-memory stores in tests.

mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::features::rate_limits::models::{
    RateLimitRecord, RateLimitingSettings, SecuritySetting,
};

pub use postgres::{PgRateLimitStore, PgSecuritySettingsStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Counter storage for `rate_limit_tracking`
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Most recent record for the pair whose window started at or after `since`
    async fn find_active(
        &self,
        identifier: &str,
        endpoint: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<RateLimitRecord>, StoreError>;

    /// Open a new window with a count of one
    async fn insert_window(
        &self,
        identifier: &str,
        endpoint: &str,
        window_start: DateTime<Utc>,
    ) -> Result<RateLimitRecord, StoreError>;

    /// Increment the counter only while it is below `max_requests`.
    ///
    /// Returns the new count, or `None` when the record was already at the limit.
    async fn increment_below(
        &self,
        record: &RateLimitRecord,
        max_requests: i32,
    ) -> Result<Option<i32>, StoreError>;

    /// Delete records whose window started before `before`
    async fn purge_before(&self, before: DateTime<Utc>) -> Result<u64, StoreError>;
}

/// Source of the global security toggles, read at call time
#[async_trait]
pub trait SecuritySettingsStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<SecuritySetting>, StoreError>;

    async fn set_rate_limiting(
        &self,
        settings: RateLimitingSettings,
        updated_by: &str,
    ) -> Result<SecuritySetting, StoreError>;
}
