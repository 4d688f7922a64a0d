use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::notifications::models::{ConfirmationEmail, EmailKind};
use crate::shared::validation::REFERENCE_REGEX;

/// Request DTO for sending a confirmation e-mail
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SendConfirmationDto {
    #[serde(rename = "type")]
    pub kind: EmailKind,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 2, max = 120, message = "Name must be 2-120 characters"))]
    pub nom: String,

    #[validate(regex(path = *REFERENCE_REGEX, message = "Invalid reference format"))]
    pub reference: String,

    /// Optional template fields: subject, organisation, objet, urgence
    pub data: Option<serde_json::Value>,
}

impl From<SendConfirmationDto> for ConfirmationEmail {
    fn from(dto: SendConfirmationDto) -> Self {
        ConfirmationEmail {
            kind: dto.kind,
            email: dto.email,
            nom: dto.nom,
            reference: dto.reference,
            data: dto.data,
        }
    }
}

/// Response DTO with the provider message id
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConfirmationResponseDto {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_send_confirmation_dto_reads_type_field() {
        let dto: SendConfirmationDto = serde_json::from_value(json!({
            "type": "avis",
            "email": "citoyen@example.td",
            "nom": "Fatimé",
            "reference": "DA-000010",
            "data": { "organisation": "Mairie" }
        }))
        .unwrap();

        assert_eq!(dto.kind, EmailKind::Avis);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_send_confirmation_dto_validation() {
        let dto = SendConfirmationDto {
            kind: EmailKind::Contact,
            email: "not-an-email".to_string(),
            nom: "A".to_string(),
            reference: "ref".to_string(),
            data: None,
        };
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("nom"));
        assert!(fields.contains_key("reference"));
    }
}
