use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::admin::handlers;
use crate::features::admin::services::AdminService;

/// Create admin routes (all require admin access), nested under `/api/admin`
pub fn routes(admin_service: Arc<AdminService>) -> Router {
    Router::new()
        .route("/submissions/{kind}", get(handlers::list_submissions))
        .route(
            "/submissions/{kind}/{id}",
            get(handlers::get_submission).patch(handlers::update_submission),
        )
        .route("/newsletter", get(handlers::list_newsletter))
        .with_state(admin_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::newsletter::NewsletterRepository;
    use crate::features::submissions::models::{Locale, NewSubmission, SubmissionKind};
    use crate::features::submissions::SubmissionRepository;
    use crate::shared::test_helpers::{
        with_admin_auth, InMemoryNewsletterRepository, InMemorySubmissionRepository,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn new_submission(reference: &str, nom: &str) -> NewSubmission {
        NewSubmission {
            reference: reference.to_string(),
            nom: nom.to_string(),
            email: format!("{}@example.td", nom.to_lowercase().replace(' ', ".")),
            telephone: None,
            organisation: None,
            subject: Some("Question".to_string()),
            content: "Contenu de la demande de consultation.".to_string(),
            details: json!({}),
            locale: Locale::Fr,
        }
    }

    async fn server() -> (TestServer, Vec<String>) {
        let submissions = Arc::new(InMemorySubmissionRepository::default());
        let mut ids = Vec::new();
        for (reference, nom) in [
            ("CJ-000001", "Achta Mahamat"),
            ("CJ-000002", "Moussa Faki"),
            ("CJ-000003", "Achta Brahim"),
        ] {
            let stored = submissions
                .insert(SubmissionKind::Consultation, &new_submission(reference, nom))
                .await
                .unwrap();
            ids.push(stored.id.to_string());
        }

        let newsletter = Arc::new(InMemoryNewsletterRepository::default());
        newsletter
            .subscribe("abonne@example.td", Locale::Fr)
            .await
            .unwrap();

        let app = Router::new().nest(
            "/api/admin",
            routes(Arc::new(AdminService::new(submissions, newsletter))),
        );
        (TestServer::new(with_admin_auth(app)).unwrap(), ids)
    }

    #[tokio::test]
    async fn test_list_with_search_and_pagination() {
        let (server, _) = server().await;

        let response = server
            .get("/api/admin/submissions/consultation")
            .add_query_param("search", "achta")
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["meta"]["total"], json!(2));

        let response = server
            .get("/api/admin/submissions/consultation")
            .add_query_param("page_size", 1)
            .await;
        let body: Value = response.json();
        assert_eq!(body["meta"]["total"], json!(3));
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["reference"], json!("CJ-000003"));

        let response = server
            .get("/api/admin/submissions/consultation")
            .add_query_param("status", "traite")
            .await;
        let body: Value = response.json();
        assert_eq!(body["meta"]["total"], json!(0));
    }

    #[tokio::test]
    async fn test_patch_status_and_conflict() {
        let (server, ids) = server().await;
        let path = format!("/api/admin/submissions/consultation/{}", ids[0]);

        let response = server
            .patch(&path)
            .json(&json!({ "status": "en_cours", "internalNotes": "Pris en charge" }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["status"], json!("en_cours"));
        assert_eq!(body["data"]["internalNotes"], json!("Pris en charge"));

        server
            .patch(&path)
            .json(&json!({ "status": "nouveau" }))
            .await
            .assert_status(StatusCode::CONFLICT);

        server
            .get(&path)
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_unknown_submission_returns_404() {
        let (server, ids) = server().await;

        server
            .get(&format!("/api/admin/submissions/contact/{}", ids[0]))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_newsletter() {
        let (server, _) = server().await;

        let body: Value = server.get("/api/admin/newsletter").await.json();
        assert_eq!(body["meta"]["total"], json!(1));
        assert_eq!(body["data"][0]["email"], json!("abonne@example.td"));
    }

    #[tokio::test]
    async fn test_requires_authentication() {
        let submissions = Arc::new(InMemorySubmissionRepository::default());
        let app = Router::new().nest(
            "/api/admin",
            routes(Arc::new(AdminService::new(
                submissions,
                Arc::new(InMemoryNewsletterRepository::default()),
            ))),
        );
        let server = TestServer::new(app).unwrap();

        server
            .get("/api/admin/submissions/avis")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
