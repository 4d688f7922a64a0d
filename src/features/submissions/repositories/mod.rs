mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::submissions::models::{
    NewSubmission, Submission, SubmissionFilter, SubmissionKind, SubmissionUpdate,
};

pub use postgres::PgSubmissionRepository;

/// Storage of the five submission tables
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// `Conflict` when the reference is already taken in that table
    async fn insert(&self, kind: SubmissionKind, new: &NewSubmission) -> Result<Submission>;

    async fn find_by_id(&self, kind: SubmissionKind, id: Uuid) -> Result<Option<Submission>>;

    async fn find_by_reference(
        &self,
        kind: SubmissionKind,
        reference: &str,
    ) -> Result<Option<Submission>>;

    /// Newest first, with the total matching count
    async fn list(
        &self,
        kind: SubmissionKind,
        filter: &SubmissionFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Submission>, i64)>;

    /// `None` when the row is gone or no longer has `update.expected_status`
    async fn update(
        &self,
        kind: SubmissionKind,
        id: Uuid,
        update: &SubmissionUpdate,
    ) -> Result<Option<Submission>>;
}
