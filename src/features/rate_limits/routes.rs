use std::sync::Arc;

use axum::{routing::get, Router};

use super::handlers::{get_rate_limiting_setting, update_rate_limiting_setting};
use super::services::SecuritySettingsService;

/// Create admin routes for security settings
pub fn admin_routes(settings_service: Arc<SecuritySettingsService>) -> Router {
    Router::new()
        .route(
            "/api/admin/security-settings/rate-limiting",
            get(get_rate_limiting_setting).put(update_rate_limiting_setting),
        )
        .with_state(settings_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{with_admin_auth, with_super_admin_auth, InMemorySecuritySettings};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    fn service() -> Arc<SecuritySettingsService> {
        Arc::new(SecuritySettingsService::new(Arc::new(
            InMemorySecuritySettings::empty(),
        )))
    }

    #[tokio::test]
    async fn test_get_unset_setting_reports_disabled() {
        let server = TestServer::new(with_admin_auth(admin_routes(service()))).unwrap();

        let response = server.get("/api/admin/security-settings/rate-limiting").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["enabled"], json!(false));
        assert!(body["data"]["updatedAt"].is_null());
    }

    #[tokio::test]
    async fn test_super_admin_can_enable_rate_limiting() {
        let server = TestServer::new(with_super_admin_auth(admin_routes(service()))).unwrap();

        let response = server
            .put("/api/admin/security-settings/rate-limiting")
            .json(&json!({ "enabled": true }))
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = server
            .get("/api/admin/security-settings/rate-limiting")
            .await
            .json();
        assert_eq!(body["data"]["enabled"], json!(true));
        assert_eq!(body["data"]["updatedBy"], json!("test-admin-id"));
    }

    #[tokio::test]
    async fn test_admin_cannot_change_rate_limiting() {
        let server = TestServer::new(with_admin_auth(admin_routes(service()))).unwrap();

        let response = server
            .put("/api/admin/security-settings/rate-limiting")
            .json(&json!({ "enabled": false }))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_anonymous_request_is_rejected() {
        let server = TestServer::new(admin_routes(service())).unwrap();

        let response = server.get("/api/admin/security-settings/rate-limiting").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
