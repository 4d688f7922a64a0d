use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::admin::dtos::{AdminSubmissionDto, AdminSubscriptionDto, UpdateSubmissionDto};
use crate::features::newsletter::NewsletterRepository;
use crate::features::notifications::models::redact_reference;
use crate::features::submissions::models::{SubmissionFilter, SubmissionKind, SubmissionUpdate};
use crate::features::submissions::SubmissionRepository;

/// Service for admin console operations
pub struct AdminService {
    submissions: Arc<dyn SubmissionRepository>,
    newsletter: Arc<dyn NewsletterRepository>,
}

impl AdminService {
    pub fn new(
        submissions: Arc<dyn SubmissionRepository>,
        newsletter: Arc<dyn NewsletterRepository>,
    ) -> Self {
        Self {
            submissions,
            newsletter,
        }
    }

    // =========================================================================
    // SUBMISSIONS
    // =========================================================================

    /// List submissions of one kind with filters and pagination
    pub async fn list_submissions(
        &self,
        kind: SubmissionKind,
        filter: &SubmissionFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<AdminSubmissionDto>, i64)> {
        let (rows, total) = self.submissions.list(kind, filter, offset, limit).await?;

        let items = rows
            .into_iter()
            .map(|s| AdminSubmissionDto::new(kind, s))
            .collect();

        Ok((items, total))
    }

    pub async fn get_submission(&self, kind: SubmissionKind, id: Uuid) -> Result<AdminSubmissionDto> {
        let submission = self
            .submissions
            .find_by_id(kind, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", kind, id)))?;

        Ok(AdminSubmissionDto::new(kind, submission))
    }

    /// Change status and/or internal notes.
    ///
    /// Status changes must follow the triage workflow, otherwise `Conflict`.
    pub async fn update_submission(
        &self,
        kind: SubmissionKind,
        id: Uuid,
        dto: UpdateSubmissionDto,
        updated_by: &str,
    ) -> Result<AdminSubmissionDto> {
        let current = self
            .submissions
            .find_by_id(kind, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", kind, id)))?;

        if let Some(next) = dto.status {
            if !current.status.can_transition_to(next) {
                return Err(AppError::Conflict(format!(
                    "Cannot move {} from '{}' to '{}'",
                    kind, current.status, next
                )));
            }
        }

        let update = SubmissionUpdate {
            expected_status: current.status,
            status: dto.status,
            internal_notes: dto.internal_notes.map(|n| n.trim().to_string()),
        };

        let Some(updated) = self.submissions.update(kind, id, &update).await? else {
            // Changed or deleted since it was read
            return match self.submissions.find_by_id(kind, id).await? {
                Some(latest) => Err(AppError::Conflict(format!(
                    "{} was moved to '{}' concurrently, reload and retry",
                    kind, latest.status
                ))),
                None => Err(AppError::NotFound(format!("{} {} not found", kind, id))),
            };
        };

        tracing::info!(
            "Submission updated: type={}, ref={}, status={}, by={}",
            kind,
            redact_reference(&updated.reference),
            updated.status,
            updated_by
        );

        Ok(AdminSubmissionDto::new(kind, updated))
    }

    // =========================================================================
    // NEWSLETTER
    // =========================================================================

    pub async fn list_newsletter(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<AdminSubscriptionDto>, i64)> {
        let (rows, total) = self.newsletter.list(offset, limit).await?;
        Ok((rows.into_iter().map(Into::into).collect(), total))
    }
}
