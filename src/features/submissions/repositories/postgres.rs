use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::SubmissionRepository;
use crate::core::error::{AppError, Result};
use crate::features::submissions::models::{
    NewSubmission, Submission, SubmissionFilter, SubmissionKind, SubmissionUpdate,
};

const COLUMNS: &str = "id, reference, nom, email, telephone, organisation, subject, content, \
                       details, locale, status, internal_notes, created_at, updated_at";

/// Submission tables backed by PostgreSQL.
///
/// Table names come from [`SubmissionKind::table`], never from user input.
pub struct PgSubmissionRepository {
    pool: PgPool,
}

impl PgSubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn search_pattern(search: &Option<String>) -> Option<String> {
    search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")))
}

#[async_trait]
impl SubmissionRepository for PgSubmissionRepository {
    async fn insert(&self, kind: SubmissionKind, new: &NewSubmission) -> Result<Submission> {
        let sql = format!(
            r#"
            INSERT INTO {} (reference, nom, email, telephone, organisation, subject, content, details, locale)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            kind.table(),
            COLUMNS
        );

        sqlx::query_as::<_, Submission>(&sql)
            .bind(&new.reference)
            .bind(&new.nom)
            .bind(&new.email)
            .bind(&new.telephone)
            .bind(&new.organisation)
            .bind(&new.subject)
            .bind(&new.content)
            .bind(&new.details)
            .bind(new.locale)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                let duplicate = e
                    .as_database_error()
                    .is_some_and(|db| db.is_unique_violation());
                if duplicate {
                    return AppError::Conflict(format!(
                        "Reference {} already in use",
                        new.reference
                    ));
                }
                tracing::error!("Failed to insert {}: {:?}", kind, e);
                AppError::Database(e)
            })
    }

    async fn find_by_id(&self, kind: SubmissionKind, id: Uuid) -> Result<Option<Submission>> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", COLUMNS, kind.table());

        let submission = sqlx::query_as::<_, Submission>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(submission)
    }

    async fn find_by_reference(
        &self,
        kind: SubmissionKind,
        reference: &str,
    ) -> Result<Option<Submission>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE reference = $1 ORDER BY created_at DESC LIMIT 1",
            COLUMNS,
            kind.table()
        );

        let submission = sqlx::query_as::<_, Submission>(&sql)
            .bind(reference)
            .fetch_optional(&self.pool)
            .await?;

        Ok(submission)
    }

    async fn list(
        &self,
        kind: SubmissionKind,
        filter: &SubmissionFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Submission>, i64)> {
        let pattern = search_pattern(&filter.search);
        let predicate = r#"
            ($1::submission_status IS NULL OR status = $1)
            AND ($2::text IS NULL OR nom ILIKE $2 OR email ILIKE $2 OR reference ILIKE $2)
        "#;

        // Get total count
        let count_sql = format!("SELECT COUNT(*) FROM {} WHERE {}", kind.table(), predicate);
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(filter.status)
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count {}: {:?}", kind, e);
                AppError::Database(e)
            })?;

        // Get paginated data
        let list_sql = format!(
            "SELECT {} FROM {} WHERE {} ORDER BY created_at DESC OFFSET $3 LIMIT $4",
            COLUMNS,
            kind.table(),
            predicate
        );
        let rows = sqlx::query_as::<_, Submission>(&list_sql)
            .bind(filter.status)
            .bind(&pattern)
            .bind(offset)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list {}: {:?}", kind, e);
                AppError::Database(e)
            })?;

        Ok((rows, total))
    }

    async fn update(
        &self,
        kind: SubmissionKind,
        id: Uuid,
        update: &SubmissionUpdate,
    ) -> Result<Option<Submission>> {
        let sql = format!(
            r#"
            UPDATE {}
            SET status = COALESCE($2, status),
                internal_notes = COALESCE($3, internal_notes),
                updated_at = NOW()
            WHERE id = $1 AND status = $4
            RETURNING {}
            "#,
            kind.table(),
            COLUMNS
        );

        let submission = sqlx::query_as::<_, Submission>(&sql)
            .bind(id)
            .bind(update.status)
            .bind(&update.internal_notes)
            .bind(update.expected_status)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update {} {}: {:?}", kind, id, e);
                AppError::Database(e)
            })?;

        Ok(submission)
    }
}
