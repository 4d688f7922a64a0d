mod security_settings_dto;

pub use security_settings_dto::*;
