use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::{RequireAdmin, RequireSuperAdmin};
use crate::features::rate_limits::dtos::{
    RateLimitingSettingDto, UpdateRateLimitingSettingDto,
};
use crate::features::rate_limits::services::SecuritySettingsService;
use crate::shared::types::ApiResponse;

/// Get the rate limiting toggle
#[utoipa::path(
    get,
    path = "/api/admin/security-settings/rate-limiting",
    responses(
        (status = 200, description = "Rate limiting setting", body = ApiResponse<RateLimitingSettingDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "security-settings",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_rate_limiting_setting(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<SecuritySettingsService>>,
) -> Result<Json<ApiResponse<RateLimitingSettingDto>>> {
    let response = service
        .get_rate_limiting()
        .await?
        .map(RateLimitingSettingDto::from)
        .unwrap_or_else(RateLimitingSettingDto::unset);

    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// Turn rate limiting on or off
#[utoipa::path(
    put,
    path = "/api/admin/security-settings/rate-limiting",
    request_body = UpdateRateLimitingSettingDto,
    responses(
        (status = 200, description = "Updated rate limiting setting", body = ApiResponse<RateLimitingSettingDto>),
        (status = 400, description = "Invalid request body"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Super admin access required")
    ),
    tag = "security-settings",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_rate_limiting_setting(
    RequireSuperAdmin(user): RequireSuperAdmin,
    State(service): State<Arc<SecuritySettingsService>>,
    AppJson(dto): AppJson<UpdateRateLimitingSettingDto>,
) -> Result<Json<ApiResponse<RateLimitingSettingDto>>> {
    let setting = service
        .set_rate_limiting(dto.enabled, &user.account_id)
        .await?;

    Ok(Json(ApiResponse::success(Some(setting.into()), None, None)))
}
