use async_trait::async_trait;
use sqlx::PgPool;

use super::NewsletterRepository;
use crate::core::error::{AppError, Result};
use crate::features::newsletter::models::Subscription;
use crate::features::submissions::models::Locale;

pub struct PgNewsletterRepository {
    pool: PgPool,
}

impl PgNewsletterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NewsletterRepository for PgNewsletterRepository {
    async fn subscribe(&self, email: &str, locale: Locale) -> Result<(Subscription, bool)> {
        let inserted = sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO newsletter_subscriptions (email, locale)
            VALUES ($1, $2)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, locale, created_at
            "#,
        )
        .bind(email)
        .bind(locale)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert newsletter subscription: {:?}", e);
            AppError::Database(e)
        })?;

        if let Some(subscription) = inserted {
            return Ok((subscription, true));
        }

        let existing = sqlx::query_as::<_, Subscription>(
            r#"
            SELECT id, email, locale, created_at
            FROM newsletter_subscriptions
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok((existing, false))
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<Subscription>, i64)> {
        // Get total count
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM newsletter_subscriptions")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count newsletter subscriptions: {:?}", e);
                AppError::Database(e)
            })?;

        // Get paginated data
        let rows = sqlx::query_as::<_, Subscription>(
            r#"
            SELECT id, email, locale, created_at
            FROM newsletter_subscriptions
            ORDER BY created_at DESC
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }
}
