use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, ClientIdentifier};
use crate::features::rate_limits::models::rate_limit_headers;
use crate::features::references::dtos::{GenerateReferenceDto, ReferenceResponseDto};
use crate::features::references::routes::ReferenceState;
use crate::shared::constants::ENDPOINT_GENERATE_REFERENCE;
use crate::shared::types::ApiResponse;

/// Generate a tracking reference for a form
///
/// Public endpoint used by the website forms before inserting a submission.
/// Clients fall back to a local code when this call fails.
#[utoipa::path(
    post,
    path = "/api/references",
    request_body = GenerateReferenceDto,
    responses(
        (status = 201, description = "Reference generated", body = ApiResponse<ReferenceResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 429, description = "Too many requests"),
        (status = 500, description = "Generator unavailable")
    ),
    tag = "references"
)]
pub async fn generate_reference(
    State(state): State<ReferenceState>,
    client: ClientIdentifier,
    AppJson(dto): AppJson<GenerateReferenceDto>,
) -> Result<impl IntoResponse> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let decision = state
        .rate_limiter
        .enforce(client.as_str(), ENDPOINT_GENERATE_REFERENCE)
        .await?;

    let reference = state
        .references
        .generate(&dto.form_type, &dto.form_code)
        .await?;

    let headers = rate_limit_headers(&decision, Utc::now()).to_header_map();

    Ok((
        StatusCode::CREATED,
        headers,
        Json(ApiResponse::success(
            Some(ReferenceResponseDto { reference }),
            None,
            None,
        )),
    ))
}
