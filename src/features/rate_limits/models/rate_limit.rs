use axum::http::{HeaderMap, HeaderName, HeaderValue};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

pub const HEADER_RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";
pub const HEADER_RATE_LIMIT_RESET: &str = "x-ratelimit-reset";
pub const HEADER_RETRY_AFTER: &str = "retry-after";

/// Row of `rate_limit_tracking`: one counter per (identifier, endpoint, window)
#[derive(Debug, Clone, FromRow)]
pub struct RateLimitRecord {
    pub id: Uuid,
    pub identifier: String,
    pub endpoint: String,
    pub window_start: DateTime<Utc>,
    pub request_count: i32,
}

/// Static policy for one protected endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: i32,
    pub window_minutes: i64,
    pub endpoint: String,
}

impl RateLimitConfig {
    pub fn new(endpoint: impl Into<String>, max_requests: i32, window_minutes: i64) -> Self {
        Self {
            max_requests,
            window_minutes,
            endpoint: endpoint.into(),
        }
    }

    pub fn window(&self) -> Duration {
        Duration::minutes(self.window_minutes)
    }
}

/// Outcome of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: i32,
    pub reset_at: DateTime<Utc>,
}

impl RateLimitDecision {
    /// Decision returned when limiting is disabled: full quota, reset now
    pub fn disabled(config: &RateLimitConfig, now: DateTime<Utc>) -> Self {
        Self {
            allowed: true,
            remaining: config.max_requests,
            reset_at: now,
        }
    }

    /// Decision returned when the tracking store cannot be read
    pub fn fail_open(config: &RateLimitConfig, now: DateTime<Utc>) -> Self {
        Self {
            allowed: true,
            remaining: config.max_requests,
            reset_at: now + config.window(),
        }
    }

    pub fn denied(reset_at: DateTime<Utc>) -> Self {
        Self {
            allowed: false,
            remaining: 0,
            reset_at,
        }
    }
}

/// Advisory headers derived from a [`RateLimitDecision`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitHeaders {
    pub remaining: String,
    pub reset: String,
    pub retry_after: String,
}

/// Map a decision to its advisory header values.
///
/// `Retry-After` is the number of whole seconds until `reset_at`, rounded up
/// and never negative.
pub fn rate_limit_headers(decision: &RateLimitDecision, now: DateTime<Utc>) -> RateLimitHeaders {
    let millis = (decision.reset_at - now).num_milliseconds();
    let retry_after = if millis <= 0 { 0 } else { (millis + 999) / 1000 };

    RateLimitHeaders {
        remaining: decision.remaining.max(0).to_string(),
        reset: decision
            .reset_at
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        retry_after: retry_after.to_string(),
    }
}

impl RateLimitHeaders {
    pub fn to_header_map(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in [
            (HEADER_RATE_LIMIT_REMAINING, &self.remaining),
            (HEADER_RATE_LIMIT_RESET, &self.reset),
            (HEADER_RETRY_AFTER, &self.retry_after),
        ] {
            if let Ok(value) = HeaderValue::from_str(value) {
                headers.insert(HeaderName::from_static(name), value);
            }
        }
        headers
    }
}
