use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::model::AuthenticatedUser;

/// DTO for /api/admin/me response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponseDto {
    pub account_id: String,
    pub email: Option<String>,
    pub roles: Vec<String>,
    pub is_super_admin: bool,
}

impl From<AuthenticatedUser> for MeResponseDto {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            is_super_admin: user.is_super_admin(),
            account_id: user.account_id,
            email: user.email,
            roles: user.roles,
        }
    }
}
