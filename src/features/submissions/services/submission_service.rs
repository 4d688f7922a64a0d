use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::notifications::models::{redact_reference, ConfirmationEmail};
use crate::features::notifications::ConfirmationMailer;
use crate::features::rate_limits::models::RateLimitDecision;
use crate::features::rate_limits::RateLimitService;
use crate::features::references::models::ReferenceSource;
use crate::features::references::ReferenceService;
use crate::features::submissions::dtos::TrackingResponseDto;
use crate::features::submissions::models::{
    NewSubmission, Submission, SubmissionDraft, SubmissionKind,
};
use crate::features::submissions::repositories::SubmissionRepository;
use crate::shared::constants::ENDPOINT_TRACK;
use crate::shared::validation::REFERENCE_REGEX;

/// Attempts at storing a submission before giving up on reference collisions
const MAX_INSERT_ATTEMPTS: usize = 3;

/// Outcome of a stored public submission
#[derive(Debug)]
pub struct SubmissionReceipt {
    pub submission: Submission,
    pub reference_source: ReferenceSource,
    pub decision: RateLimitDecision,
}

/// Public submission flow shared by every form
pub struct SubmissionService {
    repository: Arc<dyn SubmissionRepository>,
    references: Arc<ReferenceService>,
    rate_limiter: Arc<RateLimitService>,
    mailer: Arc<ConfirmationMailer>,
}

impl SubmissionService {
    pub fn new(
        repository: Arc<dyn SubmissionRepository>,
        references: Arc<ReferenceService>,
        rate_limiter: Arc<RateLimitService>,
        mailer: Arc<ConfirmationMailer>,
    ) -> Self {
        Self {
            repository,
            references,
            rate_limiter,
            mailer,
        }
    }

    /// Store a validated form.
    ///
    /// Rate limit, issue a reference, insert, then queue the confirmation
    /// e-mail. The e-mail outcome never affects the response.
    pub async fn submit(
        &self,
        identifier: &str,
        kind: SubmissionKind,
        draft: SubmissionDraft,
    ) -> Result<SubmissionReceipt> {
        let decision = self.rate_limiter.enforce(identifier, kind.endpoint()).await?;

        let (submission, reference_source) = self.insert_with_reference(kind, &draft).await?;

        tracing::info!(
            "Submission stored: type={}, ref={}, source={:?}",
            kind,
            redact_reference(&submission.reference),
            reference_source
        );

        if let Some(email_kind) = kind.email_kind() {
            self.mailer.notify_in_background(ConfirmationEmail {
                kind: email_kind,
                email: submission.email.clone(),
                nom: submission.nom.clone(),
                reference: submission.reference.clone(),
                data: draft.mail_data,
            });
        }

        Ok(SubmissionReceipt {
            submission,
            reference_source,
            decision,
        })
    }

    /// Issue a reference and insert, retrying with a fresh reference when the
    /// code is already taken
    async fn insert_with_reference(
        &self,
        kind: SubmissionKind,
        draft: &SubmissionDraft,
    ) -> Result<(Submission, ReferenceSource)> {
        for attempt in 1..=MAX_INSERT_ATTEMPTS {
            let issued = self
                .references
                .issue(kind.as_str(), kind.form_code())
                .await;
            let reference_source = issued.source();
            let new = NewSubmission::from_draft(draft, issued.into_code());

            match self.repository.insert(kind, &new).await {
                Ok(submission) => return Ok((submission, reference_source)),
                Err(AppError::Conflict(_)) => {
                    tracing::warn!(
                        "Reference collision: type={}, ref={}, attempt={}",
                        kind,
                        redact_reference(&new.reference),
                        attempt
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::Internal(format!(
            "No unique {} reference after {} attempts",
            kind, MAX_INSERT_ATTEMPTS
        )))
    }

    /// Public status lookup by reference
    pub async fn track(
        &self,
        identifier: &str,
        reference: &str,
    ) -> Result<(TrackingResponseDto, RateLimitDecision)> {
        let decision = self.rate_limiter.enforce(identifier, ENDPOINT_TRACK).await?;

        let reference = reference.trim().to_uppercase();
        if !REFERENCE_REGEX.is_match(&reference) {
            return Err(AppError::Validation("Invalid reference format".to_string()));
        }

        let not_found = || AppError::NotFound("Aucune demande ne correspond à cette référence".to_string());

        let kind = SubmissionKind::from_reference(&reference).ok_or_else(not_found)?;
        let submission = self
            .repository
            .find_by_reference(kind, &reference)
            .await?
            .ok_or_else(not_found)?;

        Ok((TrackingResponseDto::new(kind, submission), decision))
    }
}
