use crate::features::auth::handler;
use axum::{routing::get, Router};

/// Admin console identity route (requires JWT authentication)
pub fn protected_routes() -> Router {
    Router::new().route("/api/admin/me", get(handler::get_me))
}
