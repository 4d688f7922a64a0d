use std::sync::Arc;

use crate::core::error::Result;
use crate::features::newsletter::models::{normalize_email, Subscription};
use crate::features::newsletter::repositories::NewsletterRepository;
use crate::features::rate_limits::models::RateLimitDecision;
use crate::features::rate_limits::RateLimitService;
use crate::features::submissions::models::Locale;
use crate::shared::constants::ENDPOINT_NEWSLETTER;

pub struct NewsletterService {
    repository: Arc<dyn NewsletterRepository>,
    rate_limiter: Arc<RateLimitService>,
}

impl NewsletterService {
    pub fn new(
        repository: Arc<dyn NewsletterRepository>,
        rate_limiter: Arc<RateLimitService>,
    ) -> Self {
        Self {
            repository,
            rate_limiter,
        }
    }

    /// Subscribe an address; subscribing twice keeps the first row
    pub async fn subscribe(
        &self,
        identifier: &str,
        email: &str,
        locale: Locale,
    ) -> Result<(Subscription, bool, RateLimitDecision)> {
        let decision = self
            .rate_limiter
            .enforce(identifier, ENDPOINT_NEWSLETTER)
            .await?;

        let (subscription, created) = self
            .repository
            .subscribe(&normalize_email(email), locale)
            .await?;

        if created {
            tracing::info!("Newsletter subscription created: id={}", subscription.id);
        }

        Ok((subscription, created, decision))
    }

    pub async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<Subscription>, i64)> {
        self.repository.list(offset, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{rate_limit_service, InMemoryNewsletterRepository};

    fn service() -> NewsletterService {
        let (rate_limiter, _) = rate_limit_service(true);
        NewsletterService::new(
            Arc::new(InMemoryNewsletterRepository::default()),
            Arc::new(rate_limiter),
        )
    }

    #[tokio::test]
    async fn test_subscribe_is_idempotent_per_address() {
        let service = service();

        let (first, created, _) = service
            .subscribe("client-a", "Citoyen@Example.td", Locale::Fr)
            .await
            .unwrap();
        assert!(created);
        assert_eq!(first.email, "citoyen@example.td");

        let (second, created, _) = service
            .subscribe("client-a", " citoyen@example.td", Locale::En)
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(second.id, first.id);
        assert_eq!(second.locale, Locale::Fr);

        let (rows, total) = service.list(0, 20).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_subscribe_is_rate_limited() {
        let service = service();
        let limit = service.rate_limiter.policy(ENDPOINT_NEWSLETTER).max_requests;

        for i in 0..limit {
            service
                .subscribe("client-a", &format!("user{}@example.td", i), Locale::Fr)
                .await
                .unwrap();
        }

        let result = service
            .subscribe("client-a", "late@example.td", Locale::Fr)
            .await;
        assert!(result.is_err());
    }
}
