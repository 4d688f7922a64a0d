use crate::core::error::AppError;
use crate::features::auth::JwtValidator;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::prelude::*;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

/// Headers the public site reads to show "try again in N minutes"
const RATE_LIMIT_HEADERS: [HeaderName; 3] = [
    header::RETRY_AFTER,
    HeaderName::from_static("x-ratelimit-remaining"),
    HeaderName::from_static("x-ratelimit-reset"),
];

/// Request ID generator using UUID v7 (time-ordered)
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::now_v7().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Request span carrying the request id.
///
/// Only the path is recorded: tracking URLs embed citizen references and
/// query strings may carry admin search terms.
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            path = %span_path(request.uri().path()),
            request_id = %request_id,
        )
    }
}

/// Masks the reference segment of tracking URLs
fn span_path(path: &str) -> String {
    match path.strip_prefix("/api/submissions/track/") {
        Some(_) => "/api/submissions/track/{reference}".to_string(),
        None => path.to_string(),
    }
}

/// CORS for the public site; rate-limit headers are exposed to scripts
pub fn cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(RATE_LIMIT_HEADERS);

    if allowed_origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

fn basic_credentials(req: &Request) -> Option<String> {
    let encoded = req
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Basic ")?;
    let decoded = BASE64_STANDARD.decode(encoded).ok()?;
    String::from_utf8(decoded).ok()
}

/// Basic auth in front of Swagger UI; `credentials` is `user:password`
pub async fn swagger_basic_auth(
    State(credentials): State<Arc<String>>,
    req: Request,
    next: Next,
) -> Response {
    if basic_credentials(&req).as_deref() == Some(credentials.as_str()) {
        return next.run(req).await;
    }

    (
        StatusCode::UNAUTHORIZED,
        [(
            header::WWW_AUTHENTICATE,
            HeaderValue::from_static("Basic realm=\"AJE API\""),
        )],
        Body::from("Unauthorized"),
    )
        .into_response()
}

/// Admin console authentication: bearer JWT from the auth platform
pub async fn auth_middleware(
    State(validator): State<Arc<JwtValidator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("Invalid authorization header format".to_string())
    })?;

    let user = validator.validate_token(token)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware::from_fn_with_state, routing::get, Router};
    use axum_test::TestServer;
    use std::time::Duration;

    fn swagger_server() -> TestServer {
        let app = Router::new()
            .route("/swagger-ui", get(|| async { "docs" }))
            .layer(from_fn_with_state(
                Arc::new("greffe:secret".to_string()),
                swagger_basic_auth,
            ));
        TestServer::new(app).unwrap()
    }

    fn basic(credentials: &str) -> HeaderValue {
        let encoded = BASE64_STANDARD.encode(credentials);
        HeaderValue::from_str(&format!("Basic {}", encoded)).unwrap()
    }

    #[tokio::test]
    async fn test_swagger_requires_matching_credentials() {
        let server = swagger_server();

        let response = server.get("/swagger-ui").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));

        server
            .get("/swagger-ui")
            .add_header(header::AUTHORIZATION, basic("greffe:wrong"))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        server
            .get("/swagger-ui")
            .add_header(header::AUTHORIZATION, basic("greffe:secret"))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_admin_routes_reject_missing_or_malformed_token() {
        let validator = Arc::new(JwtValidator::new(
            "test-secret-with-enough-entropy",
            "authenticated".to_string(),
            Duration::from_secs(0),
        ));
        let app = Router::new()
            .route("/api/admin/me", get(|| async { "me" }))
            .route_layer(from_fn_with_state(validator, auth_middleware));
        let server = TestServer::new(app).unwrap();

        server
            .get("/api/admin/me")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        server
            .get("/api/admin/me")
            .add_header(header::AUTHORIZATION, HeaderValue::from_static("Token abc"))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        server
            .get("/api/admin/me")
            .add_header(
                header::AUTHORIZATION,
                HeaderValue::from_static("Bearer not-a-jwt"),
            )
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_span_path_masks_references() {
        assert_eq!(
            span_path("/api/submissions/track/CJ-000042"),
            "/api/submissions/track/{reference}"
        );
        assert_eq!(span_path("/api/contact"), "/api/contact");
    }
}
