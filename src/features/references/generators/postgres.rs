use async_trait::async_trait;
use sqlx::PgPool;

use super::{ReferenceError, ReferenceGenerator};
use crate::features::references::models::format_reference;
use crate::shared::validation::FORM_CODE_REGEX;

/// Per-form-code counters in `reference_counters`
pub struct PgReferenceGenerator {
    pool: PgPool,
}

impl PgReferenceGenerator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReferenceGenerator for PgReferenceGenerator {
    async fn generate(&self, form_type: &str, form_code: &str) -> Result<String, ReferenceError> {
        // Counters are keyed by code; never open one for a malformed code
        if !FORM_CODE_REGEX.is_match(form_code) {
            return Err(ReferenceError::InvalidFormCode(form_code.to_string()));
        }

        // Single statement: the row lock serializes concurrent issuers of the same code
        let sequence: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO reference_counters (form_code, form_type, last_value)
            VALUES ($1, $2, 1)
            ON CONFLICT (form_code) DO UPDATE
            SET last_value = reference_counters.last_value + 1,
                updated_at = NOW()
            RETURNING last_value
            "#,
        )
        .bind(form_code)
        .bind(form_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(format_reference(form_code, sequence))
    }
}
