//! Request bodies of the five public forms.
//!
//! Every form maps onto the shared column set; anything specific to a form
//! goes into the `details` JSON column.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::submissions::models::{Locale, SubmissionDraft, SubmissionKind};
use crate::shared::validation::PHONE_REGEX;

/// A public form that can be turned into a stored submission.
///
/// Callers normalize before validating so length rules apply to the text
/// that is actually stored.
pub trait SubmissionForm: Validate + Sized {
    const KIND: SubmissionKind;

    /// Trim text fields; blank optional fields become `None`
    fn normalized(self) -> Self;

    fn into_draft(self) -> SubmissionDraft;
}

fn clean(value: String) -> String {
    value.trim().to_string()
}

fn clean_opt(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Keep only present values
fn details(entries: &[(&str, Option<Value>)]) -> Value {
    let map: Map<String, Value> = entries
        .iter()
        .filter_map(|(k, v)| v.clone().map(|v| (k.to_string(), v)))
        .collect();
    Value::Object(map)
}

/// Request DTO for a legal consultation
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateConsultationDto {
    #[validate(length(min = 2, max = 120, message = "Name must be 2-120 characters"))]
    pub nom: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub telephone: Option<String>,

    #[validate(length(max = 200))]
    pub organisation: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Subject must be 1-200 characters"))]
    pub subject: String,

    /// Area of law, e.g. "foncier"
    #[validate(length(max = 100))]
    pub domaine: Option<String>,

    #[validate(length(min = 10, max = 5000, message = "Message must be 10-5000 characters"))]
    pub content: String,

    #[serde(default)]
    pub locale: Locale,
}

impl SubmissionForm for CreateConsultationDto {
    const KIND: SubmissionKind = SubmissionKind::Consultation;

    fn normalized(self) -> Self {
        Self {
            nom: clean(self.nom),
            email: clean(self.email),
            telephone: clean_opt(self.telephone),
            organisation: clean_opt(self.organisation),
            subject: clean(self.subject),
            domaine: clean_opt(self.domaine),
            content: clean(self.content),
            locale: self.locale,
        }
    }

    fn into_draft(self) -> SubmissionDraft {
        SubmissionDraft {
            nom: self.nom,
            email: self.email,
            telephone: self.telephone,
            organisation: self.organisation,
            details: details(&[("domaine", self.domaine.map(Value::from))]),
            mail_data: Some(json!({ "subject": self.subject })),
            subject: Some(self.subject),
            content: self.content,
            locale: self.locale,
        }
    }
}

/// How pressing a litigation report is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Urgence {
    Faible,
    Moyenne,
    Haute,
}

impl Urgence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgence::Faible => "faible",
            Urgence::Moyenne => "moyenne",
            Urgence::Haute => "haute",
        }
    }
}

/// Request DTO for a litigation report involving the State
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSignalementDto {
    #[validate(length(min = 2, max = 120, message = "Name must be 2-120 characters"))]
    pub nom: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub telephone: Option<String>,

    #[validate(length(max = 200))]
    pub organisation: Option<String>,

    #[validate(length(max = 200, message = "Subject must be at most 200 characters"))]
    pub subject: Option<String>,

    pub urgence: Urgence,

    /// Administration or public body involved
    #[validate(length(max = 200))]
    pub entite_concernee: Option<String>,

    #[validate(length(min = 10, max = 5000, message = "Description must be 10-5000 characters"))]
    pub content: String,

    #[serde(default)]
    pub locale: Locale,
}

impl SubmissionForm for CreateSignalementDto {
    const KIND: SubmissionKind = SubmissionKind::Signalement;

    fn normalized(self) -> Self {
        Self {
            nom: clean(self.nom),
            email: clean(self.email),
            telephone: clean_opt(self.telephone),
            organisation: clean_opt(self.organisation),
            subject: clean_opt(self.subject),
            urgence: self.urgence,
            entite_concernee: clean_opt(self.entite_concernee),
            content: clean(self.content),
            locale: self.locale,
        }
    }

    fn into_draft(self) -> SubmissionDraft {
        let urgence = self.urgence.as_str();
        SubmissionDraft {
            nom: self.nom,
            email: self.email,
            telephone: self.telephone,
            organisation: self.organisation,
            subject: self.subject,
            content: self.content,
            details: details(&[
                ("urgence", Some(Value::from(urgence))),
                ("entiteConcernee", self.entite_concernee.map(Value::from)),
            ]),
            locale: self.locale,
            mail_data: Some(json!({ "urgence": urgence })),
        }
    }
}

/// Request DTO for a legal opinion request from a public body
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAvisDto {
    #[validate(length(min = 2, max = 120, message = "Name must be 2-120 characters"))]
    pub nom: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub telephone: Option<String>,

    /// Requesting ministry or institution
    #[validate(length(min = 2, max = 200, message = "Organisation must be 2-200 characters"))]
    pub organisation: String,

    /// Subject of the requested opinion
    #[validate(length(min = 1, max = 200, message = "Subject must be 1-200 characters"))]
    pub objet: String,

    #[validate(length(min = 10, max = 5000, message = "Message must be 10-5000 characters"))]
    pub content: String,

    #[serde(default)]
    pub locale: Locale,
}

impl SubmissionForm for CreateAvisDto {
    const KIND: SubmissionKind = SubmissionKind::Avis;

    fn normalized(self) -> Self {
        Self {
            nom: clean(self.nom),
            email: clean(self.email),
            telephone: clean_opt(self.telephone),
            organisation: clean(self.organisation),
            objet: clean(self.objet),
            content: clean(self.content),
            locale: self.locale,
        }
    }

    fn into_draft(self) -> SubmissionDraft {
        SubmissionDraft {
            nom: self.nom,
            email: self.email,
            telephone: self.telephone,
            mail_data: Some(json!({ "organisation": self.organisation, "objet": self.objet })),
            organisation: Some(self.organisation),
            subject: Some(self.objet),
            content: self.content,
            details: json!({}),
            locale: self.locale,
        }
    }
}

/// Request DTO for the contact form
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateContactDto {
    #[validate(length(min = 2, max = 120, message = "Name must be 2-120 characters"))]
    pub nom: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub telephone: Option<String>,

    #[validate(length(max = 200, message = "Subject must be at most 200 characters"))]
    pub subject: Option<String>,

    #[validate(length(min = 10, max = 5000, message = "Message must be 10-5000 characters"))]
    pub content: String,

    #[serde(default)]
    pub locale: Locale,
}

impl SubmissionForm for CreateContactDto {
    const KIND: SubmissionKind = SubmissionKind::Contact;

    fn normalized(self) -> Self {
        Self {
            nom: clean(self.nom),
            email: clean(self.email),
            telephone: clean_opt(self.telephone),
            subject: clean_opt(self.subject),
            content: clean(self.content),
            locale: self.locale,
        }
    }

    fn into_draft(self) -> SubmissionDraft {
        SubmissionDraft {
            nom: self.nom,
            email: self.email,
            telephone: self.telephone,
            organisation: None,
            mail_data: self.subject.as_ref().map(|s| json!({ "subject": s })),
            subject: self.subject,
            content: self.content,
            details: json!({}),
            locale: self.locale,
        }
    }
}

/// Request DTO for a job application
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCandidatureDto {
    #[validate(length(min = 2, max = 120, message = "Name must be 2-120 characters"))]
    pub nom: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub telephone: Option<String>,

    /// Position applied for
    #[validate(length(min = 2, max = 200, message = "Position must be 2-200 characters"))]
    pub poste: String,

    /// Link to the uploaded CV
    #[validate(url(message = "Invalid CV URL"))]
    pub cv_url: Option<String>,

    /// Cover letter
    #[validate(length(min = 10, max = 5000, message = "Cover letter must be 10-5000 characters"))]
    pub content: String,

    #[serde(default)]
    pub locale: Locale,
}

impl SubmissionForm for CreateCandidatureDto {
    const KIND: SubmissionKind = SubmissionKind::Candidature;

    fn normalized(self) -> Self {
        Self {
            nom: clean(self.nom),
            email: clean(self.email),
            telephone: clean_opt(self.telephone),
            poste: clean(self.poste),
            cv_url: clean_opt(self.cv_url),
            content: clean(self.content),
            locale: self.locale,
        }
    }

    fn into_draft(self) -> SubmissionDraft {
        SubmissionDraft {
            nom: self.nom,
            email: self.email,
            telephone: self.telephone,
            organisation: None,
            subject: Some(self.poste),
            content: self.content,
            details: details(&[("cvUrl", self.cv_url.map(Value::from))]),
            locale: self.locale,
            mail_data: None,
        }
    }
}
