use std::sync::Arc;

use axum::{routing::post, Router};

use crate::features::rate_limits::RateLimitService;
use crate::features::references::handlers;
use crate::features::references::services::ReferenceService;

#[derive(Clone)]
pub struct ReferenceState {
    pub references: Arc<ReferenceService>,
    pub rate_limiter: Arc<RateLimitService>,
}

/// Create routes for the references feature (public)
pub fn routes(references: Arc<ReferenceService>, rate_limiter: Arc<RateLimitService>) -> Router {
    Router::new()
        .route("/api/references", post(handlers::generate_reference))
        .with_state(ReferenceState {
            references,
            rate_limiter,
        })
}
