pub mod admin;
pub mod auth;
pub mod newsletter;
pub mod notifications;
pub mod rate_limits;
pub mod references;
pub mod submissions;
