use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;

use crate::features::rate_limits::services::RateLimitService;

/// Background worker deleting rate limit windows that can no longer be read
pub struct TrackingJanitor {
    rate_limit_service: Arc<RateLimitService>,
    every: Duration,
    retention: chrono::Duration,
}

impl TrackingJanitor {
    pub fn new(
        rate_limit_service: Arc<RateLimitService>,
        every: Duration,
        retention: chrono::Duration,
    ) -> Self {
        Self {
            rate_limit_service,
            every,
            retention,
        }
    }

    /// Run the janitor in a background loop
    pub async fn run(&self) {
        tracing::info!(
            "Starting rate limit tracking janitor (every {}s)",
            self.every.as_secs()
        );

        let mut interval = interval(self.every);

        loop {
            interval.tick().await;
            self.run_once().await;
        }
    }

    async fn run_once(&self) {
        match self.rate_limit_service.purge_expired(self.retention).await {
            Ok(0) => tracing::debug!("No expired rate limit windows to purge"),
            Ok(purged) => tracing::info!("Purged {} expired rate limit windows", purged),
            Err(e) => tracing::error!("Error purging rate limit windows: {:?}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::rate_limits::models::RateLimitConfig;
    use crate::shared::test_helpers::rate_limit_service;
    use chrono::Utc;

    #[tokio::test]
    async fn test_run_once_purges_stale_windows() {
        let (service, store) = rate_limit_service(true);
        let service = Arc::new(service);
        let config = RateLimitConfig::new("contact", 5, 60);

        service
            .check_rate_limit_at("stale", &config, Utc::now() - chrono::Duration::days(2))
            .await;
        service.check_rate_limit("fresh", &config).await;

        let janitor = TrackingJanitor::new(
            service,
            Duration::from_secs(900),
            chrono::Duration::hours(24),
        );
        janitor.run_once().await;

        assert_eq!(store.len(), 1);
    }
}
