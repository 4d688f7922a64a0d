use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, ClientIdentifier};
use crate::features::notifications::dtos::{ConfirmationResponseDto, SendConfirmationDto};
use crate::features::notifications::models::{redact_reference, ConfirmationEmail};
use crate::features::notifications::routes::NotificationState;
use crate::features::rate_limits::models::rate_limit_headers;
use crate::shared::constants::ENDPOINT_SEND_CONFIRMATION;
use crate::shared::types::ApiResponse;

/// Send a confirmation e-mail for a stored submission
///
/// Callers treat a failure here as non-fatal; the submission is already saved.
#[utoipa::path(
    post,
    path = "/api/notifications/confirmation",
    request_body = SendConfirmationDto,
    responses(
        (status = 200, description = "E-mail dispatched", body = ApiResponse<ConfirmationResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 429, description = "Too many requests"),
        (status = 502, description = "Provider unavailable")
    ),
    tag = "notifications"
)]
pub async fn send_confirmation(
    State(state): State<NotificationState>,
    client: ClientIdentifier,
    AppJson(dto): AppJson<SendConfirmationDto>,
) -> Result<impl IntoResponse> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let decision = state
        .rate_limiter
        .enforce(client.as_str(), ENDPOINT_SEND_CONFIRMATION)
        .await?;

    let email: ConfirmationEmail = dto.into();
    let id = state.mailer.send(&email).await.map_err(|e| {
        AppError::ExternalServiceError(format!(
            "confirmation {} {}: {}",
            email.kind,
            redact_reference(&email.reference),
            e
        ))
    })?;

    let headers = rate_limit_headers(&decision, Utc::now()).to_header_map();

    Ok((
        headers,
        Json(ApiResponse::success(
            Some(ConfirmationResponseDto { id }),
            None,
            None,
        )),
    ))
}
