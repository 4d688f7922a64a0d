use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::notifications::models::EmailKind;
use crate::features::references::models::form_code_of;
use crate::shared::constants::{
    ENDPOINT_AVIS, ENDPOINT_CANDIDATURE, ENDPOINT_CONSULTATION, ENDPOINT_CONTACT,
    ENDPOINT_SIGNALEMENT,
};

/// The five public forms, each stored in its own table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionKind {
    Consultation,
    Signalement,
    Avis,
    Contact,
    Candidature,
}

impl SubmissionKind {
    pub const ALL: [SubmissionKind; 5] = [
        SubmissionKind::Consultation,
        SubmissionKind::Signalement,
        SubmissionKind::Avis,
        SubmissionKind::Contact,
        SubmissionKind::Candidature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionKind::Consultation => "consultation",
            SubmissionKind::Signalement => "signalement",
            SubmissionKind::Avis => "avis",
            SubmissionKind::Contact => "contact",
            SubmissionKind::Candidature => "candidature",
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            SubmissionKind::Consultation => "consultations",
            SubmissionKind::Signalement => "signalements",
            SubmissionKind::Avis => "demandes_avis",
            SubmissionKind::Contact => "contacts",
            SubmissionKind::Candidature => "candidatures",
        }
    }

    /// Reference prefix
    pub fn form_code(&self) -> &'static str {
        match self {
            SubmissionKind::Consultation => "CJ",
            SubmissionKind::Signalement => "SC",
            SubmissionKind::Avis => "DA",
            SubmissionKind::Contact => "CT",
            SubmissionKind::Candidature => "RC",
        }
    }

    /// Rate limited endpoint name
    pub fn endpoint(&self) -> &'static str {
        match self {
            SubmissionKind::Consultation => ENDPOINT_CONSULTATION,
            SubmissionKind::Signalement => ENDPOINT_SIGNALEMENT,
            SubmissionKind::Avis => ENDPOINT_AVIS,
            SubmissionKind::Contact => ENDPOINT_CONTACT,
            SubmissionKind::Candidature => ENDPOINT_CANDIDATURE,
        }
    }

    /// Confirmation template; applications get no e-mail
    pub fn email_kind(&self) -> Option<EmailKind> {
        match self {
            SubmissionKind::Consultation => Some(EmailKind::Consultation),
            SubmissionKind::Signalement => Some(EmailKind::Signalement),
            SubmissionKind::Avis => Some(EmailKind::Avis),
            SubmissionKind::Contact => Some(EmailKind::Contact),
            SubmissionKind::Candidature => None,
        }
    }

    pub fn from_form_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.form_code() == code)
    }

    /// Kind owning a reference such as `CJ-000042`
    pub fn from_reference(reference: &str) -> Option<Self> {
        form_code_of(reference).and_then(Self::from_form_code)
    }
}

impl std::fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Triage status matching the `submission_status` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "submission_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Nouveau,
    EnCours,
    Traite,
    Rejete,
    Archive,
}

impl SubmissionStatus {
    /// Whether an admin may move a submission from `self` to `next`.
    ///
    /// Re-applying the current status is always accepted; `archive` is terminal.
    pub fn can_transition_to(&self, next: SubmissionStatus) -> bool {
        use SubmissionStatus::*;

        if *self == next {
            return true;
        }

        matches!(
            (self, next),
            (Nouveau, EnCours)
                | (EnCours, Traite)
                | (Nouveau | EnCours, Rejete)
                | (Nouveau | EnCours | Traite | Rejete, Archive)
        )
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Nouveau => write!(f, "nouveau"),
            SubmissionStatus::EnCours => write!(f, "en_cours"),
            SubmissionStatus::Traite => write!(f, "traite"),
            SubmissionStatus::Rejete => write!(f, "rejete"),
            SubmissionStatus::Archive => write!(f, "archive"),
        }
    }
}

/// Interface language of the submitting citizen
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema,
)]
#[sqlx(type_name = "site_locale", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Fr,
    Ar,
    En,
}

/// Database model shared by every submission table
#[derive(Debug, Clone, FromRow)]
pub struct Submission {
    pub id: Uuid,
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

/// Validated form content, before a reference is attached
#[derive(Debug, Clone)]
pub struct SubmissionDraft {
    pub nom: String,
    pub email: String,
    pub telephone: Option<String>,
    pub organisation: Option<String>,
    pub subject: Option<String>,
    pub content: String,
    /// Kind-specific fields
    pub details: serde_json::Value,
    pub locale: Locale,
    /// Fields substituted in the confirmation e-mail
    pub mail_data: Option<serde_json::Value>,
}

/// Row to insert
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub reference: String,
    pub nom: String,
    pub email: String,
    pub telephone: Option<String>,
    pub organisation: Option<String>,
    pub subject: Option<String>,
    pub content: String,
    pub details: serde_json::Value,
    pub locale: Locale,
}

impl NewSubmission {
    pub fn from_draft(draft: &SubmissionDraft, reference: String) -> Self {
        Self {
            reference,
            nom: draft.nom.clone(),
            email: draft.email.clone(),
            telephone: draft.telephone.clone(),
            organisation: draft.organisation.clone(),
            subject: draft.subject.clone(),
            content: draft.content.clone(),
            details: draft.details.clone(),
            locale: draft.locale,
        }
    }
}

/// Admin list filters
#[derive(Debug, Clone, Default)]
pub struct SubmissionFilter {
    pub status: Option<SubmissionStatus>,
    /// Matched against name, e-mail and reference
    pub search: Option<String>,
}

/// Admin changes; `None` leaves the column untouched.
///
/// Applied only while the row still has `expected_status`, the status the
/// transition was checked against.
#[derive(Debug, Clone)]
pub struct SubmissionUpdate {
    pub expected_status: SubmissionStatus,
    pub status: Option<SubmissionStatus>,
    pub internal_notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use SubmissionStatus::*;

    #[test]
    fn test_forward_transitions() {
        assert!(Nouveau.can_transition_to(EnCours));
        assert!(EnCours.can_transition_to(Traite));
        assert!(Nouveau.can_transition_to(Rejete));
        assert!(EnCours.can_transition_to(Rejete));
        assert!(Traite.can_transition_to(Archive));
        assert!(Rejete.can_transition_to(Archive));
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(!Traite.can_transition_to(EnCours));
        assert!(!Nouveau.can_transition_to(Traite));
        assert!(!Traite.can_transition_to(Rejete));
        assert!(!Rejete.can_transition_to(Nouveau));
        for next in [Nouveau, EnCours, Traite, Rejete] {
            assert!(!Archive.can_transition_to(next));
        }
    }

    #[test]
    fn test_same_status_is_allowed() {
        for status in [Nouveau, EnCours, Traite, Rejete, Archive] {
            assert!(status.can_transition_to(status));
        }
    }

    #[test]
    fn test_kind_from_reference() {
        assert_eq!(
            SubmissionKind::from_reference("CJ-000042"),
            Some(SubmissionKind::Consultation)
        );
        assert_eq!(
            SubmissionKind::from_reference("DA-12345678"),
            Some(SubmissionKind::Avis)
        );
        assert_eq!(SubmissionKind::from_reference("XX-000001"), None);
        assert_eq!(SubmissionKind::from_reference("CJ000001"), None);
    }

    #[test]
    fn test_kind_mappings_are_distinct() {
        let codes: std::collections::HashSet<_> =
            SubmissionKind::ALL.iter().map(|k| k.form_code()).collect();
        assert_eq!(codes.len(), SubmissionKind::ALL.len());
        assert_eq!(SubmissionKind::Candidature.email_kind(), None);
        assert_eq!(SubmissionKind::Avis.table(), "demandes_avis");
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(serde_json::to_value(EnCours).unwrap(), "en_cours");
        assert_eq!(EnCours.to_string(), "en_cours");
        let status: SubmissionStatus = serde_json::from_value("archive".into()).unwrap();
        assert_eq!(status, Archive);
    }
}
