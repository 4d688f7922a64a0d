//! Outbound e-mail transports.

mod log_transport;
mod resend_transport;

use async_trait::async_trait;
use thiserror::Error;

use crate::features::notifications::models::OutgoingEmail;

pub use log_transport::LogTransport;
pub use resend_transport::ResendTransport;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Template error: {0}")]
    Template(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider rejected the message with status {status}")]
    Provider { status: u16 },
}

/// Delivers a rendered message and returns the provider's message id
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<String, MailerError>;
}
