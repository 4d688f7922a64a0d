use std::collections::HashMap;
use std::env;
use std::time::Duration;

use crate::features::rate_limits::models::RateLimitConfig;
use crate::shared::constants::{DEFAULT_RATE_LIMITS, FALLBACK_RATE_LIMIT};

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub swagger: SwaggerConfig,
    pub mailer: MailerConfig,
    pub rate_limits: RateLimitSettings,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Admin console tokens are HS256 JWTs signed with the auth platform's project secret
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub audience: String,
    pub jwt_leeway: Duration,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Transactional e-mail provider configuration
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Resend API key; confirmation mails are only logged when absent
    pub api_key: Option<String>,
    /// Base URL of the provider API
    pub api_url: String,
    /// Sender shown to citizens
    pub from: String,
    /// Optional reply-to address
    pub reply_to: Option<String>,
    /// Per-request timeout for the provider call
    pub timeout: Duration,
}

/// Per-endpoint rate limit policies and janitor settings
#[derive(Debug, Clone)]
pub struct RateLimitSettings {
    pub policies: HashMap<String, RateLimitConfig>,
    /// How often expired tracking rows are purged
    pub cleanup_interval: Duration,
    /// How long a tracking row is kept after its window ended
    pub retention: chrono::Duration,
    /// Use X-Forwarded-For / X-Real-IP when identifying clients
    pub trust_proxy_headers: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            mailer: MailerConfig::from_env()?,
            rate_limits: RateLimitSettings::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 2 * 1024 * 1024; // 2MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl AuthConfig {
    const DEFAULT_AUDIENCE: &'static str = "authenticated";
    const DEFAULT_JWT_LEEWAY_SECS: u64 = 60; // 1 minute

    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = env::var("AUTH_JWT_SECRET")
            .map_err(|_| "AUTH_JWT_SECRET environment variable is required".to_string())?;

        let audience =
            env::var("AUTH_JWT_AUDIENCE").unwrap_or_else(|_| Self::DEFAULT_AUDIENCE.to_string());

        let jwt_leeway_secs = env::var("JWT_LEEWAY")
            .unwrap_or_else(|_| Self::DEFAULT_JWT_LEEWAY_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "JWT_LEEWAY must be a valid number".to_string())?;

        Ok(Self {
            jwt_secret,
            audience,
            jwt_leeway: Duration::from_secs(jwt_leeway_secs),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "AJE Tchad API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
            "API of the Agence Judiciaire de l'État public website".to_string()
        });

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl MailerConfig {
    const DEFAULT_API_URL: &'static str = "https://api.resend.com";
    const DEFAULT_FROM: &'static str = "AJE Tchad <noreply@aje.td>";
    const DEFAULT_TIMEOUT_SECS: u64 = 10;

    pub fn from_env() -> Result<Self, String> {
        let api_key = env::var("RESEND_API_KEY").ok().filter(|s| !s.is_empty());
        let api_url = env::var("MAIL_API_URL").unwrap_or_else(|_| Self::DEFAULT_API_URL.to_string());
        let from = env::var("MAIL_FROM").unwrap_or_else(|_| Self::DEFAULT_FROM.to_string());
        let reply_to = env::var("MAIL_REPLY_TO").ok().filter(|s| !s.is_empty());

        let timeout_secs = env::var("MAIL_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "MAIL_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            from,
            reply_to,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl RateLimitSettings {
    const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 900; // 15 minutes
    const DEFAULT_RETENTION_HOURS: i64 = 24;

    pub fn from_env() -> Result<Self, String> {
        let mut policies = HashMap::new();
        for (endpoint, default_max, default_window) in DEFAULT_RATE_LIMITS {
            let prefix = endpoint_env_prefix(endpoint);

            let max_requests = env::var(format!("{}_MAX", prefix))
                .unwrap_or_else(|_| default_max.to_string())
                .parse::<i32>()
                .map_err(|_| format!("{}_MAX must be a valid number", prefix))?;

            let window_minutes = env::var(format!("{}_WINDOW_MINUTES", prefix))
                .unwrap_or_else(|_| default_window.to_string())
                .parse::<i64>()
                .map_err(|_| format!("{}_WINDOW_MINUTES must be a valid number", prefix))?;

            if max_requests < 1 || window_minutes < 1 {
                return Err(format!(
                    "{}: max requests and window minutes must be at least 1",
                    prefix
                ));
            }

            policies.insert(
                endpoint.to_string(),
                RateLimitConfig::new(*endpoint, max_requests, window_minutes),
            );
        }

        let cleanup_interval_secs = env::var("RATE_LIMIT_CLEANUP_INTERVAL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_CLEANUP_INTERVAL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "RATE_LIMIT_CLEANUP_INTERVAL_SECS must be a valid number".to_string())?;

        let retention_hours = env::var("RATE_LIMIT_RETENTION_HOURS")
            .unwrap_or_else(|_| Self::DEFAULT_RETENTION_HOURS.to_string())
            .parse::<i64>()
            .map_err(|_| "RATE_LIMIT_RETENTION_HOURS must be a valid number".to_string())?;

        let trust_proxy_headers = env::var("TRUST_PROXY_HEADERS")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            policies,
            cleanup_interval: Duration::from_secs(cleanup_interval_secs.max(1)),
            retention: chrono::Duration::hours(retention_hours.max(0)),
            trust_proxy_headers,
        })
    }

    /// Built-in defaults, without reading the environment
    pub fn defaults() -> Self {
        let policies = DEFAULT_RATE_LIMITS
            .iter()
            .map(|(endpoint, max, window)| {
                (
                    endpoint.to_string(),
                    RateLimitConfig::new(*endpoint, *max, *window),
                )
            })
            .collect();

        Self {
            policies,
            cleanup_interval: Duration::from_secs(Self::DEFAULT_CLEANUP_INTERVAL_SECS),
            retention: chrono::Duration::hours(Self::DEFAULT_RETENTION_HOURS),
            trust_proxy_headers: false,
        }
    }

    /// Policy for an endpoint, falling back to a conservative default
    pub fn policy(&self, endpoint: &str) -> RateLimitConfig {
        self.policies.get(endpoint).cloned().unwrap_or_else(|| {
            let (max, window) = FALLBACK_RATE_LIMIT;
            RateLimitConfig::new(endpoint, max, window)
        })
    }
}

/// "send-confirmation-email" -> "RATE_LIMIT_SEND_CONFIRMATION_EMAIL"
fn endpoint_env_prefix(endpoint: &str) -> String {
    format!(
        "RATE_LIMIT_{}",
        endpoint.replace('-', "_").to_ascii_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_env_prefix() {
        assert_eq!(endpoint_env_prefix("avis"), "RATE_LIMIT_AVIS");
        assert_eq!(
            endpoint_env_prefix("send-confirmation-email"),
            "RATE_LIMIT_SEND_CONFIRMATION_EMAIL"
        );
    }

    #[test]
    fn test_rate_limit_defaults_cover_public_endpoints() {
        let settings = RateLimitSettings::defaults();
        let avis = settings.policy("avis");
        assert_eq!(avis.max_requests, 3);
        assert_eq!(avis.window_minutes, 60);
        assert_eq!(avis.endpoint, "avis");

        let track = settings.policy("track");
        assert_eq!(track.max_requests, 30);
        assert_eq!(track.window_minutes, 10);
    }

    #[test]
    fn test_rate_limit_policy_fallback_for_unknown_endpoint() {
        let settings = RateLimitSettings::defaults();
        let policy = settings.policy("unknown");
        assert_eq!(policy.endpoint, "unknown");
        assert_eq!(policy.max_requests, FALLBACK_RATE_LIMIT.0);
        assert_eq!(policy.window_minutes, FALLBACK_RATE_LIMIT.1);
    }
}
