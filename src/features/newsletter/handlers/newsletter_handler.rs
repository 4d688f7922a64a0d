use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, ClientIdentifier};
use crate::features::newsletter::dtos::{SubscribeDto, SubscriptionResponseDto};
use crate::features::newsletter::services::NewsletterService;
use crate::features::rate_limits::models::rate_limit_headers;
use crate::shared::types::ApiResponse;

/// Subscribe to the newsletter
///
/// Returns 201 for a new address and 200 when it was already subscribed.
#[utoipa::path(
    post,
    path = "/api/newsletter",
    request_body = SubscribeDto,
    responses(
        (status = 201, description = "Subscribed", body = ApiResponse<SubscriptionResponseDto>),
        (status = 200, description = "Already subscribed", body = ApiResponse<SubscriptionResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 429, description = "Too many requests")
    ),
    tag = "newsletter"
)]
pub async fn subscribe(
    State(service): State<Arc<NewsletterService>>,
    client: ClientIdentifier,
    AppJson(dto): AppJson<SubscribeDto>,
) -> Result<impl IntoResponse> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (subscription, created, decision) = service
        .subscribe(client.as_str(), &dto.email, dto.locale)
        .await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let headers = rate_limit_headers(&decision, Utc::now()).to_header_map();

    Ok((
        status,
        headers,
        Json(ApiResponse::success(
            Some(SubscriptionResponseDto::from(subscription)),
            Some("Merci pour votre inscription.".to_string()),
            None,
        )),
    ))
}
