//! Primary reference generators.

mod postgres;

use async_trait::async_trait;
use thiserror::Error;

pub use postgres::PgReferenceGenerator;

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid form code: {0}")]
    InvalidFormCode(String),

    #[error("Generator returned no reference")]
    Empty,
}

/// Issues a unique reference for a form
#[async_trait]
pub trait ReferenceGenerator: Send + Sync {
    async fn generate(&self, form_type: &str, form_code: &str) -> Result<String, ReferenceError>;
}
