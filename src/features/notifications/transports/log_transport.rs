use async_trait::async_trait;
use uuid::Uuid;

use super::{EmailTransport, MailerError};
use crate::features::notifications::models::OutgoingEmail;

/// Transport used when no provider key is configured: records the dispatch only
pub struct LogTransport;

#[async_trait]
impl EmailTransport for LogTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<String, MailerError> {
        let id = format!("log-{}", Uuid::now_v7());
        tracing::info!(
            "E-mail provider not configured, confirmation not delivered: id={}, subject={:?}",
            id,
            email.subject
        );
        Ok(id)
    }
}
