mod postgres;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::newsletter::models::Subscription;
use crate::features::submissions::models::Locale;

pub use postgres::PgNewsletterRepository;

#[async_trait]
pub trait NewsletterRepository: Send + Sync {
    /// Insert unless the address already exists.
    ///
    /// Returns the stored row and whether it was created by this call.
    async fn subscribe(&self, email: &str, locale: Locale) -> Result<(Subscription, bool)>;

    /// Newest first, with the total count
    async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<Subscription>, i64)>;
}
