use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::submissions::handlers;
use crate::features::submissions::services::SubmissionService;

/// Create routes for the public forms
pub fn routes(service: Arc<SubmissionService>) -> Router {
    Router::new()
        .route("/api/consultations", post(handlers::create_consultation))
        .route("/api/signalements", post(handlers::create_signalement))
        .route("/api/demandes-avis", post(handlers::create_demande_avis))
        .route("/api/contact", post(handlers::create_contact))
        .route("/api/candidatures", post(handlers::create_candidature))
        .route(
            "/api/submissions/track/{reference}",
            get(handlers::track_submission),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extractor::ProxyPolicy;
    use crate::features::notifications::ConfirmationMailer;
    use crate::features::references::ReferenceService;
    use crate::features::notifications::EmailTransport;
    use crate::shared::test_helpers::{
        rate_limit_service, FailingTransport, InMemoryReferenceGenerator,
        InMemorySubmissionRepository, RecordingTransport,
    };
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum::Extension;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn forwarded_for() -> HeaderName {
        HeaderName::from_static("x-forwarded-for")
    }

    fn server_with(transport: Arc<dyn EmailTransport>) -> TestServer {
        let (rate_limiter, _) = rate_limit_service(true);
        let service = SubmissionService::new(
            Arc::new(InMemorySubmissionRepository::default()),
            Arc::new(ReferenceService::new(Arc::new(
                InMemoryReferenceGenerator::default(),
            ))),
            Arc::new(rate_limiter),
            Arc::new(ConfirmationMailer::new(transport)),
        );
        let app = routes(Arc::new(service)).layer(Extension(ProxyPolicy {
            trust_forwarded_headers: true,
        }));
        TestServer::new(app).unwrap()
    }

    fn server() -> TestServer {
        server_with(Arc::new(RecordingTransport::default()))
    }

    fn avis() -> Value {
        json!({
            "nom": "Mariam Djibrine",
            "email": "mariam@example.td",
            "organisation": "Ministère des Finances",
            "objet": "Contrat de bail",
            "content": "Demande d'avis sur un contrat de bail administratif."
        })
    }

    #[tokio::test]
    async fn test_create_demande_avis() {
        let server = server();

        let response = server.post("/api/demandes-avis").json(&avis()).await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["data"]["reference"], json!("DA-000001"));
        assert_eq!(body["data"]["referenceSource"], json!("generated"));
        assert_eq!(body["data"]["status"], json!("nouveau"));
        assert_eq!(
            response.headers().get("x-ratelimit-remaining").unwrap(),
            "2"
        );
    }

    #[tokio::test]
    async fn test_fourth_request_in_window_is_rejected() {
        let server = server();

        for _ in 0..3 {
            server
                .post("/api/demandes-avis")
                .add_header(forwarded_for(), HeaderValue::from_static("203.0.113.5"))
                .json(&avis())
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server
            .post("/api/demandes-avis")
            .add_header(forwarded_for(), HeaderValue::from_static("203.0.113.5"))
            .json(&avis())
            .await;

        response.assert_status(StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get("x-ratelimit-remaining").unwrap(),
            "0"
        );
        assert!(response.headers().contains_key("retry-after"));
        let body: Value = response.json();
        assert_eq!(body["success"], json!(false));

        // A different client is unaffected
        server
            .post("/api/demandes-avis")
            .add_header(forwarded_for(), HeaderValue::from_static("198.51.100.7"))
            .json(&avis())
            .await
            .assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_client_supplied_forwarded_entries_do_not_reset_the_limit() {
        let server = server();

        let mut statuses = Vec::new();
        for i in 0..5 {
            let forwarded = HeaderValue::from_str(&format!("10.9.9.{}, 203.0.113.5", i)).unwrap();
            let response = server
                .post("/api/demandes-avis")
                .add_header(forwarded_for(), forwarded)
                .json(&avis())
                .await;
            statuses.push(response.status_code());
        }

        assert_eq!(
            statuses,
            vec![
                StatusCode::CREATED,
                StatusCode::CREATED,
                StatusCode::CREATED,
                StatusCode::TOO_MANY_REQUESTS,
                StatusCode::TOO_MANY_REQUESTS,
            ]
        );
    }

    #[tokio::test]
    async fn test_whitespace_padded_fields_are_rejected() {
        let server = server();

        let response = server
            .post("/api/consultations")
            .json(&json!({
                "nom": " a ",
                "email": "achta@example.td",
                "subject": "   ",
                "content": "            "
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_submission_succeeds_when_mail_fails() {
        let server = server_with(Arc::new(FailingTransport));

        let response = server
            .post("/api/contact")
            .json(&json!({
                "nom": "Idriss Deby",
                "email": "idriss@example.td",
                "content": "Bonjour, une question sur vos horaires."
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["data"]["reference"], json!("CT-000001"));
    }

    #[tokio::test]
    async fn test_validation_errors_return_400() {
        let server = server();

        let response = server
            .post("/api/consultations")
            .json(&json!({
                "nom": "A",
                "email": "bad",
                "subject": "Conseil",
                "content": "court"
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_every_form_route_creates() {
        let server = server();

        let cases = [
            (
                "/api/consultations",
                json!({
                    "nom": "Achta Mahamat",
                    "email": "achta@example.td",
                    "subject": "Succession",
                    "content": "Question relative à une succession.",
                    "locale": "ar"
                }),
                "CJ-",
            ),
            (
                "/api/signalements",
                json!({
                    "nom": "Hassan Ali",
                    "email": "hassan@example.td",
                    "urgence": "moyenne",
                    "content": "Un contentieux est en cours avec une administration."
                }),
                "SC-",
            ),
            (
                "/api/candidatures",
                json!({
                    "nom": "Zara Oumar",
                    "email": "zara@example.td",
                    "poste": "Juriste",
                    "content": "Je souhaite rejoindre l'Agence en tant que juriste."
                }),
                "RC-",
            ),
        ];

        for (path, body, prefix) in cases {
            let response = server.post(path).json(&body).await;
            response.assert_status(StatusCode::CREATED);
            let json: Value = response.json();
            let reference = json["data"]["reference"].as_str().unwrap().to_string();
            assert!(reference.starts_with(prefix), "{} -> {}", path, reference);
        }
    }

    #[tokio::test]
    async fn test_track_submission() {
        let server = server();

        server
            .post("/api/demandes-avis")
            .json(&avis())
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.get("/api/submissions/track/DA-000001").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["kind"], json!("avis"));
        assert_eq!(body["data"]["status"], json!("nouveau"));
        assert!(body["data"].get("email").is_none());

        server
            .get("/api/submissions/track/DA-000002")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
