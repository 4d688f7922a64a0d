mod rate_limit_service;
mod security_settings_service;

pub use rate_limit_service::RateLimitService;
pub use security_settings_service::SecuritySettingsService;
