use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::shared::validation::FORM_CODE_REGEX;

/// Request DTO for generating a reference
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReferenceDto {
    /// Logical form name, e.g. "consultation"
    #[validate(length(min = 1, max = 50, message = "Form type must be 1-50 characters"))]
    pub form_type: String,

    /// Reference prefix, e.g. "CJ"
    #[validate(regex(path = *FORM_CODE_REGEX, message = "Form code must be 2-4 upper-case letters"))]
    pub form_code: String,
}

/// Response DTO for a generated reference
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReferenceResponseDto {
    pub reference: String,
}
