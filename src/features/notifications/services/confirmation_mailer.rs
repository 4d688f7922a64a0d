use std::sync::Arc;

use tokio::task::JoinHandle;

use super::templates::render_confirmation;
use crate::features::notifications::models::{redact_reference, ConfirmationEmail};
use crate::features::notifications::transports::{EmailTransport, MailerError};

/// Sends the confirmation e-mails of public submissions
pub struct ConfirmationMailer {
    transport: Arc<dyn EmailTransport>,
}

impl ConfirmationMailer {
    pub fn new(transport: Arc<dyn EmailTransport>) -> Self {
        Self { transport }
    }

    /// Render and dispatch, returning the provider message id
    pub async fn send(&self, email: &ConfirmationEmail) -> Result<String, MailerError> {
        let outgoing = render_confirmation(email)?;
        self.transport.send(&outgoing).await
    }

    /// Best-effort dispatch on its own task.
    ///
    /// The outcome is logged with the submission type and a redacted
    /// reference only; it never reaches the caller.
    pub fn notify_in_background(self: &Arc<Self>, email: ConfirmationEmail) -> JoinHandle<()> {
        let mailer = Arc::clone(self);
        tokio::spawn(async move {
            let reference = redact_reference(&email.reference);
            match mailer.send(&email).await {
                Ok(id) => tracing::info!(
                    "Confirmation e-mail sent: type={}, ref={}, id={}",
                    email.kind,
                    reference,
                    id
                ),
                Err(e) => tracing::warn!(
                    "Confirmation e-mail failed: type={}, ref={}, error={}",
                    email.kind,
                    reference,
                    e
                ),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::notifications::models::EmailKind;
    use crate::shared::test_helpers::{FailingTransport, RecordingTransport};

    fn email() -> ConfirmationEmail {
        ConfirmationEmail {
            kind: EmailKind::Consultation,
            email: "citoyen@example.td".to_string(),
            nom: "Moussa".to_string(),
            reference: "CJ-000007".to_string(),
            data: None,
        }
    }

    #[tokio::test]
    async fn test_send_uses_transport() {
        let transport = Arc::new(RecordingTransport::default());
        let mailer = ConfirmationMailer::new(transport.clone());

        let id = mailer.send(&email()).await.unwrap();
        assert_eq!(id, "msg-1");

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "citoyen@example.td");
        assert!(sent[0].html.contains("CJ-000007"));
    }

    #[tokio::test]
    async fn test_background_failure_is_swallowed() {
        let mailer = Arc::new(ConfirmationMailer::new(Arc::new(FailingTransport)));

        let handle = mailer.notify_in_background(email());
        assert!(handle.await.is_ok());
    }

    #[tokio::test]
    async fn test_background_success_delivers() {
        let transport = Arc::new(RecordingTransport::default());
        let mailer = Arc::new(ConfirmationMailer::new(transport.clone()));

        mailer.notify_in_background(email()).await.unwrap();
        assert_eq!(transport.sent().len(), 1);
    }
}
