use std::sync::Arc;

use axum::{routing::post, Router};

use crate::features::notifications::handlers;
use crate::features::notifications::services::ConfirmationMailer;
use crate::features::rate_limits::RateLimitService;

#[derive(Clone)]
pub struct NotificationState {
    pub mailer: Arc<ConfirmationMailer>,
    pub rate_limiter: Arc<RateLimitService>,
}

/// Create routes for the notifications feature (public)
pub fn routes(mailer: Arc<ConfirmationMailer>, rate_limiter: Arc<RateLimitService>) -> Router {
    Router::new()
        .route(
            "/api/notifications/confirmation",
            post(handlers::send_confirmation),
        )
        .with_state(NotificationState {
            mailer,
            rate_limiter,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{rate_limit_service, FailingTransport, RecordingTransport};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    fn payload() -> serde_json::Value {
        json!({
            "type": "signalement",
            "email": "citoyen@example.td",
            "nom": "Abakar Issa",
            "reference": "SC-000003",
            "data": { "urgence": "haute" }
        })
    }

    #[tokio::test]
    async fn test_send_confirmation_endpoint() {
        let transport = Arc::new(RecordingTransport::default());
        let (rate_limiter, _) = rate_limit_service(true);
        let server = TestServer::new(routes(
            Arc::new(ConfirmationMailer::new(transport.clone())),
            Arc::new(rate_limiter),
        ))
        .unwrap();

        let response = server
            .post("/api/notifications/confirmation")
            .json(&payload())
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["id"], json!("msg-1"));

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].html.contains("haute"));
    }

    #[tokio::test]
    async fn test_send_confirmation_provider_failure() {
        let (rate_limiter, _) = rate_limit_service(true);
        let server = TestServer::new(routes(
            Arc::new(ConfirmationMailer::new(Arc::new(FailingTransport))),
            Arc::new(rate_limiter),
        ))
        .unwrap();

        let response = server
            .post("/api/notifications/confirmation")
            .json(&payload())
            .await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], json!(false));
        assert!(!body.to_string().contains("citoyen@example.td"));
    }

    #[tokio::test]
    async fn test_send_confirmation_rejects_unknown_type() {
        let (rate_limiter, _) = rate_limit_service(true);
        let server = TestServer::new(routes(
            Arc::new(ConfirmationMailer::new(Arc::new(RecordingTransport::default()))),
            Arc::new(rate_limiter),
        ))
        .unwrap();

        let mut body = payload();
        body["type"] = json!("candidature");
        let response = server
            .post("/api/notifications/confirmation")
            .json(&body)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
