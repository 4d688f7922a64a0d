use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::newsletter::models::Subscription;
use crate::features::submissions::models::{
    Locale, Submission, SubmissionFilter, SubmissionKind, SubmissionStatus,
};
use crate::shared::types::{default_page, default_page_size, PaginationQuery};

// =============================================================================
// SUBMISSIONS
// =============================================================================

/// Full submission as seen by the admin console
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminSubmissionDto {
    pub id: Uuid,
    pub kind: SubmissionKind,
    pub reference: String,
    pub nom: String,
    pub email: String,
    pub telephone: Option<String>,
    pub organisation: Option<String>,
    pub subject: Option<String>,
    pub content: String,
    pub details: serde_json::Value,
    pub locale: Locale,
    pub status: SubmissionStatus,
    pub internal_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminSubmissionDto {
    pub fn new(kind: SubmissionKind, s: Submission) -> Self {
        Self {
            id: s.id,
            kind,
            reference: s.reference,
            nom: s.nom,
            email: s.email,
            telephone: s.telephone,
            organisation: s.organisation,
            subject: s.subject,
            content: s.content,
            details: s.details,
            locale: s.locale,
            status: s.status,
            internal_notes: s.internal_notes,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

/// Query parameters of the submission lists
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct SubmissionListQuery {
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Number of items per page (default: 20, max: 100)
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,

    /// Only submissions in this status
    pub status: Option<SubmissionStatus>,

    /// Matches name, e-mail or reference
    pub search: Option<String>,
}

impl SubmissionListQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }

    pub fn filter(&self) -> SubmissionFilter {
        SubmissionFilter {
            status: self.status,
            search: self.search.clone(),
        }
    }
}

/// Request DTO for triaging a submission
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubmissionDto {
    pub status: Option<SubmissionStatus>,

    #[validate(length(max = 5000, message = "Notes must be at most 5000 characters"))]
    pub internal_notes: Option<String>,
}

// =============================================================================
// NEWSLETTER
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminSubscriptionDto {
    pub id: Uuid,
    pub email: String,
    pub locale: Locale,
    pub created_at: DateTime<Utc>,
}

impl From<Subscription> for AdminSubscriptionDto {
    fn from(s: Subscription) -> Self {
        Self {
            id: s.id,
            email: s.email,
            locale: s.locale,
            created_at: s.created_at,
        }
    }
}
