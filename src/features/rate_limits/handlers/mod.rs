pub mod security_settings_handler;

pub use security_settings_handler::{
    __path_get_rate_limiting_setting, __path_update_rate_limiting_setting,
    get_rate_limiting_setting, update_rate_limiting_setting,
};
