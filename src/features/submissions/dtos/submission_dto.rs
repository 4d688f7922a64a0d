use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::references::models::ReferenceSource;
use crate::features::submissions::models::{Submission, SubmissionKind, SubmissionStatus};

/// Response DTO returned to the citizen after submitting a form
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionCreatedDto {
    pub id: Uuid,
    pub reference: String,
    /// `fallback` when the counter was unavailable
    pub reference_source: ReferenceSource,
    pub status: SubmissionStatus,
}

/// Public tracking view, without contact details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackingResponseDto {
    pub kind: SubmissionKind,
    pub reference: String,
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TrackingResponseDto {
    pub fn new(kind: SubmissionKind, s: Submission) -> Self {
        Self {
            kind,
            reference: s.reference,
            status: s.status,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}
