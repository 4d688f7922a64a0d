use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{EmailTransport, MailerError};
use crate::core::config::MailerConfig;
use crate::features::notifications::models::OutgoingEmail;

#[derive(Debug, Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ResendResponse {
    id: String,
}

/// Resend transactional e-mail API
pub struct ResendTransport {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
    reply_to: Option<String>,
}

impl ResendTransport {
    pub fn new(config: &MailerConfig, api_key: String) -> Result<Self, MailerError> {
        let client = reqwest::Client::builder()
            .user_agent("AjeCore/1.0 (confirmation-mailer)")
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key,
            from: config.from.clone(),
            reply_to: config.reply_to.clone(),
        })
    }
}

#[async_trait]
impl EmailTransport for ResendTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<String, MailerError> {
        let body = ResendRequest {
            from: &self.from,
            to: [&email.to],
            subject: &email.subject,
            html: &email.html,
            reply_to: self.reply_to.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MailerError::Provider {
                status: status.as_u16(),
            });
        }

        let parsed: ResendResponse = response.json().await?;
        Ok(parsed.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = ResendRequest {
            from: "AJE <noreply@aje.td>",
            to: ["citoyen@example.td"],
            subject: "Sujet",
            html: "<p>x</p>",
            reply_to: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["to"][0], "citoyen@example.td");
        assert!(value.get("reply_to").is_none());
    }
}
