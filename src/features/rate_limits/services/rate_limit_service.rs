use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::config::RateLimitSettings;
use crate::core::error::{AppError, Result};
use crate::features::rate_limits::models::{
    rate_limit_headers, RateLimitConfig, RateLimitDecision,
};
use crate::features::rate_limits::stores::{RateLimitStore, SecuritySettingsStore};
use crate::shared::constants::SETTING_RATE_LIMITING;

/// Fixed-window request counter keyed by (identifier, endpoint).
///
/// Any failure of the backing stores lets the request through: a broken
/// limiter must never block citizens.
pub struct RateLimitService {
    store: Arc<dyn RateLimitStore>,
    settings: Arc<dyn SecuritySettingsStore>,
    policies: RateLimitSettings,
}

impl RateLimitService {
    pub fn new(
        store: Arc<dyn RateLimitStore>,
        settings: Arc<dyn SecuritySettingsStore>,
        policies: RateLimitSettings,
    ) -> Self {
        Self {
            store,
            settings,
            policies,
        }
    }

    /// Configured policy for an endpoint
    pub fn policy(&self, endpoint: &str) -> RateLimitConfig {
        self.policies.policy(endpoint)
    }

    /// Whether the global `rate_limiting` toggle is on
    async fn is_enabled(&self) -> bool {
        match self.settings.get(SETTING_RATE_LIMITING).await {
            Ok(Some(setting)) => setting.rate_limiting().enabled,
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("Failed to read rate limiting setting, allowing: {}", e);
                false
            }
        }
    }

    /// Check and count one request against `config`
    pub async fn check_rate_limit(
        &self,
        identifier: &str,
        config: &RateLimitConfig,
    ) -> RateLimitDecision {
        self.check_rate_limit_at(identifier, config, Utc::now())
            .await
    }

    /// Same as [`check_rate_limit`](Self::check_rate_limit) with an explicit clock
    pub async fn check_rate_limit_at(
        &self,
        identifier: &str,
        config: &RateLimitConfig,
        now: DateTime<Utc>,
    ) -> RateLimitDecision {
        if !self.is_enabled().await {
            return RateLimitDecision::disabled(config, now);
        }

        let window = config.window();
        let since = now - window;

        let existing = match self
            .store
            .find_active(identifier, &config.endpoint, since)
            .await
        {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(
                    "Rate limit lookup failed for endpoint '{}', failing open: {}",
                    config.endpoint,
                    e
                );
                return RateLimitDecision::fail_open(config, now);
            }
        };

        let Some(record) = existing else {
            if let Err(e) = self
                .store
                .insert_window(identifier, &config.endpoint, now)
                .await
            {
                tracing::warn!(
                    "Failed to open rate limit window for endpoint '{}': {}",
                    config.endpoint,
                    e
                );
            }

            return RateLimitDecision {
                allowed: true,
                remaining: (config.max_requests - 1).max(0),
                reset_at: now + window,
            };
        };

        let reset_at = record.window_start + window;

        if record.request_count >= config.max_requests {
            return RateLimitDecision::denied(reset_at);
        }

        match self
            .store
            .increment_below(&record, config.max_requests)
            .await
        {
            Ok(Some(count)) => RateLimitDecision {
                allowed: true,
                remaining: (config.max_requests - count).max(0),
                reset_at,
            },
            // Another request consumed the last slot between the read and the update
            Ok(None) => RateLimitDecision::denied(reset_at),
            Err(e) => {
                tracing::warn!(
                    "Failed to increment rate limit counter for endpoint '{}': {}",
                    config.endpoint,
                    e
                );
                RateLimitDecision {
                    allowed: true,
                    remaining: (config.max_requests - record.request_count - 1).max(0),
                    reset_at,
                }
            }
        }
    }

    /// Check the configured policy of `endpoint` and reject with 429 when exhausted
    pub async fn enforce(&self, identifier: &str, endpoint: &str) -> Result<RateLimitDecision> {
        let config = self.policy(endpoint);
        let now = Utc::now();
        let decision = self.check_rate_limit_at(identifier, &config, now).await;

        if !decision.allowed {
            tracing::warn!("Rate limit exceeded on endpoint '{}'", endpoint);
            return Err(AppError::RateLimitExceeded {
                message: "Trop de requêtes. Veuillez réessayer plus tard.".to_string(),
                headers: rate_limit_headers(&decision, now),
            });
        }

        Ok(decision)
    }

    /// Delete tracking rows whose window ended more than `retention` ago
    pub async fn purge_expired(&self, retention: chrono::Duration) -> Result<u64> {
        let longest_window = self
            .policies
            .policies
            .values()
            .map(|p| p.window())
            .max()
            .unwrap_or_else(|| chrono::Duration::hours(1));

        let before = Utc::now() - longest_window - retention;

        self.store.purge_before(before).await.map_err(|e| {
            tracing::error!("Failed to purge rate limit tracking: {:?}", e);
            AppError::Internal(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{
        rate_limit_service, FailingRateLimitStore, InMemoryRateLimitStore,
        InMemorySecuritySettings,
    };
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 2, 10, 0, 0).unwrap()
    }

    fn avis_config() -> RateLimitConfig {
        RateLimitConfig::new("avis", 3, 10)
    }

    #[tokio::test]
    async fn test_scenario_three_allowed_then_denied() {
        let (service, _store) = rate_limit_service(true);
        let config = avis_config();
        let ip = "203.0.113.5";

        let mut remaining = Vec::new();
        for _ in 0..3 {
            let decision = service.check_rate_limit_at(ip, &config, now()).await;
            assert!(decision.allowed);
            remaining.push(decision.remaining);
        }
        assert_eq!(remaining, vec![2, 1, 0]);

        let fourth = service.check_rate_limit_at(ip, &config, now()).await;
        assert!(!fourth.allowed);
        assert_eq!(fourth.remaining, 0);
        assert_eq!(fourth.reset_at, now() + Duration::minutes(10));
    }

    #[tokio::test]
    async fn test_exactly_n_checks_allowed() {
        let (service, _store) = rate_limit_service(true);
        for max in 1..=6 {
            let config = RateLimitConfig::new(format!("endpoint-{}", max), max, 5);
            let mut allowed = 0;
            let mut previous = i32::MAX;
            for i in 0..(max + 2) {
                let at = now() + Duration::seconds(i as i64);
                let decision = service.check_rate_limit_at("10.0.0.1", &config, at).await;
                if decision.allowed {
                    allowed += 1;
                }
                assert!(decision.remaining >= 0);
                assert!(decision.remaining <= previous);
                previous = decision.remaining;
            }
            assert_eq!(allowed, max);
        }
    }

    #[tokio::test]
    async fn test_identifiers_and_endpoints_are_independent() {
        let (service, _store) = rate_limit_service(true);
        let config = RateLimitConfig::new("avis", 1, 10);
        let other = RateLimitConfig::new("contact", 1, 10);

        assert!(service.check_rate_limit_at("a", &config, now()).await.allowed);
        assert!(!service.check_rate_limit_at("a", &config, now()).await.allowed);
        assert!(service.check_rate_limit_at("b", &config, now()).await.allowed);
        assert!(service.check_rate_limit_at("a", &other, now()).await.allowed);
    }

    #[tokio::test]
    async fn test_new_window_after_reset() {
        let (service, _store) = rate_limit_service(true);
        let config = avis_config();

        for _ in 0..4 {
            service.check_rate_limit_at("ip", &config, now()).await;
        }

        let later = now() + Duration::minutes(10) + Duration::seconds(1);
        let decision = service.check_rate_limit_at("ip", &config, later).await;
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 2);
        assert_eq!(decision.reset_at, later + Duration::minutes(10));
    }

    #[tokio::test]
    async fn test_disabled_always_allows_without_counting() {
        let (service, store) = rate_limit_service(false);
        let config = avis_config();

        for _ in 0..10 {
            let decision = service.check_rate_limit_at("ip", &config, now()).await;
            assert!(decision.allowed);
            assert_eq!(decision.remaining, 3);
            assert_eq!(decision.reset_at, now());
        }
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_missing_setting_disables_limiting() {
        let store = Arc::new(InMemoryRateLimitStore::default());
        let service = RateLimitService::new(
            store.clone(),
            Arc::new(InMemorySecuritySettings::empty()),
            RateLimitSettings::defaults(),
        );

        for _ in 0..5 {
            assert!(service.check_rate_limit_at("ip", &avis_config(), now()).await.allowed);
        }
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_store_read_failure_fails_open() {
        let service = RateLimitService::new(
            Arc::new(FailingRateLimitStore),
            Arc::new(InMemorySecuritySettings::with_rate_limiting(true)),
            RateLimitSettings::defaults(),
        );
        let config = avis_config();

        for _ in 0..5 {
            let decision = service.check_rate_limit_at("ip", &config, now()).await;
            assert!(decision.allowed);
            assert_eq!(decision.remaining, 3);
        }
    }

    #[tokio::test]
    async fn test_settings_read_failure_fails_open() {
        let service = RateLimitService::new(
            Arc::new(InMemoryRateLimitStore::default()),
            Arc::new(InMemorySecuritySettings::failing()),
            RateLimitSettings::defaults(),
        );

        for _ in 0..5 {
            assert!(service.check_rate_limit_at("ip", &avis_config(), now()).await.allowed);
        }
    }

    #[tokio::test]
    async fn test_enforce_rejects_with_retry_after() {
        let (service, _store) = rate_limit_service(true);
        let max = service.policy("avis").max_requests;

        for _ in 0..max {
            assert!(service.enforce("ip", "avis").await.is_ok());
        }

        match service.enforce("ip", "avis").await {
            Err(AppError::RateLimitExceeded { headers, .. }) => {
                assert_eq!(headers.remaining, "0");
                let retry_after: i64 = headers.retry_after.parse().unwrap();
                assert!(retry_after > 0 && retry_after <= 3600);
            }
            other => panic!("expected rate limit rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_purge_expired_keeps_recent_windows() {
        let (service, store) = rate_limit_service(true);
        let config = avis_config();
        let old = Utc::now() - Duration::days(3);

        service.check_rate_limit_at("old", &config, old).await;
        service.check_rate_limit("fresh", &config).await;
        assert_eq!(store.len(), 2);

        let purged = service.purge_expired(Duration::hours(24)).await.unwrap();
        assert_eq!(purged, 1);
        assert_eq!(store.len(), 1);
    }
}
