use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, ClientIdentifier};
use crate::features::rate_limits::models::rate_limit_headers;
use crate::features::submissions::dtos::{
    CreateAvisDto, CreateCandidatureDto, CreateConsultationDto, CreateContactDto,
    CreateSignalementDto, SubmissionCreatedDto, SubmissionForm,
};
use crate::features::submissions::services::SubmissionService;
use crate::shared::types::ApiResponse;

const RECEIVED_MESSAGE: &str = "Votre demande a bien été enregistrée.";

async fn submit_form<F: SubmissionForm>(
    service: &SubmissionService,
    client: &ClientIdentifier,
    dto: F,
) -> Result<Response> {
    let dto = dto.normalized();
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let receipt = service
        .submit(client.as_str(), F::KIND, dto.into_draft())
        .await?;

    let headers = rate_limit_headers(&receipt.decision, Utc::now()).to_header_map();
    let body = SubmissionCreatedDto {
        id: receipt.submission.id,
        reference: receipt.submission.reference,
        reference_source: receipt.reference_source,
        status: receipt.submission.status,
    };

    Ok((
        StatusCode::CREATED,
        headers,
        Json(ApiResponse::success(
            Some(body),
            Some(RECEIVED_MESSAGE.to_string()),
            None,
        )),
    )
        .into_response())
}

/// Submit a legal consultation request
#[utoipa::path(
    post,
    path = "/api/consultations",
    request_body = CreateConsultationDto,
    responses(
        (status = 201, description = "Consultation stored", body = ApiResponse<SubmissionCreatedDto>),
        (status = 400, description = "Validation error"),
        (status = 429, description = "Too many requests")
    ),
    tag = "submissions"
)]
pub async fn create_consultation(
    State(service): State<Arc<SubmissionService>>,
    client: ClientIdentifier,
    AppJson(dto): AppJson<CreateConsultationDto>,
) -> Result<Response> {
    submit_form(&service, &client, dto).await
}

/// Report a litigation involving the State
#[utoipa::path(
    post,
    path = "/api/signalements",
    request_body = CreateSignalementDto,
    responses(
        (status = 201, description = "Report stored", body = ApiResponse<SubmissionCreatedDto>),
        (status = 400, description = "Validation error"),
        (status = 429, description = "Too many requests")
    ),
    tag = "submissions"
)]
pub async fn create_signalement(
    State(service): State<Arc<SubmissionService>>,
    client: ClientIdentifier,
    AppJson(dto): AppJson<CreateSignalementDto>,
) -> Result<Response> {
    submit_form(&service, &client, dto).await
}

/// Request a legal opinion
#[utoipa::path(
    post,
    path = "/api/demandes-avis",
    request_body = CreateAvisDto,
    responses(
        (status = 201, description = "Request stored", body = ApiResponse<SubmissionCreatedDto>),
        (status = 400, description = "Validation error"),
        (status = 429, description = "Too many requests")
    ),
    tag = "submissions"
)]
pub async fn create_demande_avis(
    State(service): State<Arc<SubmissionService>>,
    client: ClientIdentifier,
    AppJson(dto): AppJson<CreateAvisDto>,
) -> Result<Response> {
    submit_form(&service, &client, dto).await
}

/// Send a contact message
#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = CreateContactDto,
    responses(
        (status = 201, description = "Message stored", body = ApiResponse<SubmissionCreatedDto>),
        (status = 400, description = "Validation error"),
        (status = 429, description = "Too many requests")
    ),
    tag = "submissions"
)]
pub async fn create_contact(
    State(service): State<Arc<SubmissionService>>,
    client: ClientIdentifier,
    AppJson(dto): AppJson<CreateContactDto>,
) -> Result<Response> {
    submit_form(&service, &client, dto).await
}

/// Apply for a position
///
/// No confirmation e-mail is sent for applications.
#[utoipa::path(
    post,
    path = "/api/candidatures",
    request_body = CreateCandidatureDto,
    responses(
        (status = 201, description = "Application stored", body = ApiResponse<SubmissionCreatedDto>),
        (status = 400, description = "Validation error"),
        (status = 429, description = "Too many requests")
    ),
    tag = "submissions"
)]
pub async fn create_candidature(
    State(service): State<Arc<SubmissionService>>,
    client: ClientIdentifier,
    AppJson(dto): AppJson<CreateCandidatureDto>,
) -> Result<Response> {
    submit_form(&service, &client, dto).await
}
