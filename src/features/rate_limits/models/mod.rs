mod rate_limit;
mod security_setting;

pub use rate_limit::*;
pub use security_setting::*;
