use super::model::{AppMetadata, AuthenticatedUser};
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::time::Duration;

/// Validates admin console access tokens signed with the project's HS256 secret
pub struct JwtValidator {
    decoding_key: DecodingKey,
    audience: String,
    leeway: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(rename = "exp")]
    _exp: u64,
    #[serde(default)]
    app_metadata: AppMetadata,
}

impl JwtValidator {
    pub fn new(secret: &str, audience: String, leeway: Duration) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            audience,
            leeway: leeway.as_secs(),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        if header.alg != Algorithm::HS256 {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}. Only HS256 is allowed",
                header.alg
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.audience]);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let claims = token_data.claims;

        Ok(AuthenticatedUser {
            roles: claims.app_metadata.all_roles(),
            account_id: claims.sub,
            email: claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "test-secret-with-enough-entropy";

    fn token(claims: serde_json::Value, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn validator() -> JwtValidator {
        JwtValidator::new(SECRET, "authenticated".to_string(), Duration::from_secs(0))
    }

    fn exp_in(secs: i64) -> i64 {
        chrono::Utc::now().timestamp() + secs
    }

    #[test]
    fn test_valid_token_yields_roles() {
        let t = token(
            json!({
                "sub": "admin-1",
                "email": "greffe@aje.td",
                "aud": "authenticated",
                "exp": exp_in(3600),
                "app_metadata": { "roles": ["admin"] }
            }),
            SECRET,
        );

        let user = validator().validate_token(&t).unwrap();
        assert_eq!(user.account_id, "admin-1");
        assert_eq!(user.email.as_deref(), Some("greffe@aje.td"));
        assert!(user.has_admin_access());
    }

    #[test]
    fn test_token_without_metadata_has_no_roles() {
        let t = token(
            json!({ "sub": "citizen", "aud": "authenticated", "exp": exp_in(3600) }),
            SECRET,
        );
        let user = validator().validate_token(&t).unwrap();
        assert!(user.roles.is_empty());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let t = token(
            json!({ "sub": "x", "aud": "authenticated", "exp": exp_in(3600) }),
            "another-secret",
        );
        assert!(matches!(validator().validate_token(&t), Err(AppError::Auth(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let t = token(
            json!({ "sub": "x", "aud": "authenticated", "exp": exp_in(-600) }),
            SECRET,
        );
        assert!(validator().validate_token(&t).is_err());
    }

    #[test]
    fn test_wrong_audience_is_rejected() {
        let t = token(
            json!({ "sub": "x", "aud": "anon", "exp": exp_in(3600) }),
            SECRET,
        );
        assert!(validator().validate_token(&t).is_err());
    }
}
