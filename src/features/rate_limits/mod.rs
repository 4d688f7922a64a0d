//! Rate limiting of the public submission endpoints.
//!
//! Fixed-window counters in `rate_limit_tracking`, keyed by a hashed client
//! identifier and the protected endpoint name. The global toggle lives in
//! `security_settings` under `rate_limiting`.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/admin/security-settings/rate-limiting` | Admin | Read toggle |
//! | PUT | `/api/admin/security-settings/rate-limiting` | Super admin | Update toggle |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod stores;
pub mod workers;

pub use services::{RateLimitService, SecuritySettingsService};
pub use stores::{PgRateLimitStore, PgSecuritySettingsStore};
pub use workers::TrackingJanitor;
