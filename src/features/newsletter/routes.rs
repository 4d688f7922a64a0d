use std::sync::Arc;

use axum::{routing::post, Router};

use crate::features::newsletter::handlers;
use crate::features::newsletter::services::NewsletterService;

/// Create routes for the newsletter feature (public)
pub fn routes(service: Arc<NewsletterService>) -> Router {
    Router::new()
        .route("/api/newsletter", post(handlers::subscribe))
        .with_state(service)
}
