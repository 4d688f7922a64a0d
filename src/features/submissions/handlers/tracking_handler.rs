use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use crate::core::error::Result;
use crate::core::extractor::ClientIdentifier;
use crate::features::rate_limits::models::rate_limit_headers;
use crate::features::submissions::dtos::TrackingResponseDto;
use crate::features::submissions::services::SubmissionService;
use crate::shared::types::ApiResponse;

/// Track a submission by its reference
#[utoipa::path(
    get,
    path = "/api/submissions/track/{reference}",
    params(
        ("reference" = String, Path, description = "Reference code, e.g. CJ-000042")
    ),
    responses(
        (status = 200, description = "Submission status", body = ApiResponse<TrackingResponseDto>),
        (status = 400, description = "Malformed reference"),
        (status = 404, description = "Unknown reference"),
        (status = 429, description = "Too many requests")
    ),
    tag = "submissions"
)]
pub async fn track_submission(
    State(service): State<Arc<SubmissionService>>,
    client: ClientIdentifier,
    Path(reference): Path<String>,
) -> Result<impl IntoResponse> {
    let (tracking, decision) = service.track(client.as_str(), &reference).await?;
    let headers = rate_limit_headers(&decision, Utc::now()).to_header_map();

    Ok((
        headers,
        Json(ApiResponse::success(Some(tracking), None, None)),
    ))
}
