use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, ConnectInfo, FromRequest, FromRequestParts, Request},
    http::{request::Parts, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;

/// Custom JSON extractor that provides consistent error responses
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppJsonRejection(rejection)),
        }
    }
}

pub struct AppJsonRejection(JsonRejection);

impl IntoResponse for AppJsonRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err),
            JsonRejection::JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err),
            JsonRejection::MissingJsonContentType(err) => {
                format!("Missing JSON content type: {}", err)
            }
            _ => "Failed to parse JSON body".to_string(),
        };

        AppError::BadRequest(message).into_response()
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

/// Whether forwarding headers set by the reverse proxy can be trusted.
///
/// Inserted as a request extension; absent means untrusted.
#[derive(Debug, Clone, Copy)]
pub struct ProxyPolicy {
    pub trust_forwarded_headers: bool,
}

/// Rate limit subject of the current request: SHA-256 hex of the client address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentifier(pub String);

impl ClientIdentifier {
    pub fn from_address(address: &str) -> Self {
        let digest = Sha256::digest(address.trim().as_bytes());
        Self(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Last address of X-Forwarded-For, then X-Real-IP.
///
/// Proxies append to X-Forwarded-For, so only the right-most entry was
/// written by the proxy in front of us; earlier entries come from the client.
fn forwarded_address(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.rsplit(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
        .map(str::to_string)
}

impl<S> FromRequestParts<S> for ClientIdentifier
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let trust_forwarded = parts
            .extensions
            .get::<ProxyPolicy>()
            .map(|p| p.trust_forwarded_headers)
            .unwrap_or(false);

        let forwarded = if trust_forwarded {
            forwarded_address(&parts.headers)
        } else {
            None
        };

        let address = forwarded
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            })
            .unwrap_or_else(|| "unknown".to_string());

        Ok(ClientIdentifier::from_address(&address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_identifier_is_hashed() {
        let id = ClientIdentifier::from_address("203.0.113.5");
        assert_eq!(id.as_str().len(), 64);
        assert!(!id.as_str().contains("203"));
        assert_eq!(id, ClientIdentifier::from_address(" 203.0.113.5 "));
    }

    #[test]
    fn test_forwarded_address_takes_proxy_appended_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("10.9.9.1, 203.0.113.5"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(forwarded_address(&headers).as_deref(), Some("203.0.113.5"));
    }

    #[test]
    fn test_forwarded_address_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.7"));
        assert_eq!(forwarded_address(&headers).as_deref(), Some("198.51.100.7"));
        assert_eq!(forwarded_address(&HeaderMap::new()), None);
    }

    async fn identify(
        policy: Option<ProxyPolicy>,
        forwarded_for: &'static str,
    ) -> ClientIdentifier {
        let mut request = axum::http::Request::builder()
            .header("x-forwarded-for", forwarded_for)
            .body(())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 10], 4000))));
        if let Some(policy) = policy {
            request.extensions_mut().insert(policy);
        }
        let (mut parts, _) = request.into_parts();
        ClientIdentifier::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_forwarded_headers_ignored_unless_trusted() {
        let untrusted = identify(None, "203.0.113.5").await;
        assert_eq!(untrusted, ClientIdentifier::from_address("192.0.2.10"));

        let trusted = identify(
            Some(ProxyPolicy {
                trust_forwarded_headers: true,
            }),
            "10.9.9.1, 203.0.113.5",
        )
        .await;
        assert_eq!(trusted, ClientIdentifier::from_address("203.0.113.5"));
    }
}
