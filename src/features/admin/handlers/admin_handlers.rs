use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::admin::dtos::*;
use crate::features::admin::services::AdminService;
use crate::features::auth::guards::RequireAdmin;
use crate::features::submissions::models::SubmissionKind;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List submissions of one kind (paginated, newest first)
#[utoipa::path(
    get,
    path = "/api/admin/submissions/{kind}",
    params(
        ("kind" = SubmissionKind, Path, description = "consultation, signalement, avis, contact or candidature"),
        SubmissionListQuery
    ),
    responses(
        (status = 200, description = "List of submissions", body = ApiResponse<Vec<AdminSubmissionDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_submissions(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<AdminService>>,
    Path(kind): Path<SubmissionKind>,
    Query(params): Query<SubmissionListQuery>,
) -> Result<Json<ApiResponse<Vec<AdminSubmissionDto>>>> {
    let page = params.pagination();
    let (items, total) = service
        .list_submissions(kind, &params.filter(), page.offset(), page.limit())
        .await?;

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Get one submission
#[utoipa::path(
    get,
    path = "/api/admin/submissions/{kind}/{id}",
    params(
        ("kind" = SubmissionKind, Path, description = "Submission kind"),
        ("id" = Uuid, Path, description = "Submission ID")
    ),
    responses(
        (status = 200, description = "Submission", body = ApiResponse<AdminSubmissionDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_submission(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<AdminService>>,
    Path((kind, id)): Path<(SubmissionKind, Uuid)>,
) -> Result<Json<ApiResponse<AdminSubmissionDto>>> {
    let submission = service.get_submission(kind, id).await?;
    Ok(Json(ApiResponse::success(Some(submission), None, None)))
}

/// Update status and internal notes of a submission
#[utoipa::path(
    patch,
    path = "/api/admin/submissions/{kind}/{id}",
    params(
        ("kind" = SubmissionKind, Path, description = "Submission kind"),
        ("id" = Uuid, Path, description = "Submission ID")
    ),
    request_body = UpdateSubmissionDto,
    responses(
        (status = 200, description = "Submission updated", body = ApiResponse<AdminSubmissionDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Status transition not allowed")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_submission(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<AdminService>>,
    Path((kind, id)): Path<(SubmissionKind, Uuid)>,
    AppJson(dto): AppJson<UpdateSubmissionDto>,
) -> Result<Json<ApiResponse<AdminSubmissionDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let submission = service
        .update_submission(kind, id, dto, &user.account_id)
        .await?;

    Ok(Json(ApiResponse::success(
        Some(submission),
        Some("Submission updated".to_string()),
        None,
    )))
}

/// List newsletter subscriptions (paginated)
#[utoipa::path(
    get,
    path = "/api/admin/newsletter",
    params(PaginationQuery),
    responses(
        (status = 200, description = "List of subscriptions", body = ApiResponse<Vec<AdminSubscriptionDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_newsletter(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<AdminService>>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<AdminSubscriptionDto>>>> {
    let (items, total) = service
        .list_newsletter(params.offset(), params.limit())
        .await?;

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}
