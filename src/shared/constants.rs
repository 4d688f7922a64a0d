/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Super admin role - can change security settings
pub const ROLE_SUPER_ADMIN: &str = "super_admin";

/// Admin role - can triage and answer citizen submissions
pub const ROLE_ADMIN: &str = "admin";

// =============================================================================
// SECURITY SETTINGS
// =============================================================================

/// `security_settings.setting_key` holding the rate limiting toggle
pub const SETTING_RATE_LIMITING: &str = "rate_limiting";

// =============================================================================
// RATE LIMITED ENDPOINTS
// =============================================================================

pub const ENDPOINT_CONSULTATION: &str = "consultation";
pub const ENDPOINT_SIGNALEMENT: &str = "signalement";
pub const ENDPOINT_AVIS: &str = "avis";
pub const ENDPOINT_CONTACT: &str = "contact";
pub const ENDPOINT_CANDIDATURE: &str = "candidature";
pub const ENDPOINT_NEWSLETTER: &str = "newsletter";
pub const ENDPOINT_GENERATE_REFERENCE: &str = "generate-reference";
pub const ENDPOINT_SEND_CONFIRMATION: &str = "send-confirmation-email";
pub const ENDPOINT_TRACK: &str = "track";

/// Default policy per endpoint: (endpoint, max requests, window minutes)
pub const DEFAULT_RATE_LIMITS: &[(&str, i32, i64)] = &[
    (ENDPOINT_CONSULTATION, 3, 60),
    (ENDPOINT_SIGNALEMENT, 3, 60),
    (ENDPOINT_AVIS, 3, 60),
    (ENDPOINT_CONTACT, 5, 60),
    (ENDPOINT_CANDIDATURE, 3, 60),
    (ENDPOINT_NEWSLETTER, 5, 60),
    (ENDPOINT_GENERATE_REFERENCE, 10, 60),
    (ENDPOINT_SEND_CONFIRMATION, 10, 60),
    (ENDPOINT_TRACK, 30, 10),
];

/// Policy applied to an endpoint with no configured limit
pub const FALLBACK_RATE_LIMIT: (i32, i64) = (5, 60);
