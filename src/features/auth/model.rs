use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::{ROLE_ADMIN, ROLE_SUPER_ADMIN};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    /// Check if user has a specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Check if user is super admin
    pub fn is_super_admin(&self) -> bool {
        self.has_role(ROLE_SUPER_ADMIN)
    }

    /// Check if user can use the admin console (admin or super_admin)
    pub fn has_admin_access(&self) -> bool {
        self.is_super_admin() || self.has_role(ROLE_ADMIN)
    }
}

/// `app_metadata` claim written by the auth platform
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppMetadata {
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl AppMetadata {
    /// Roles from either the `roles` array or the single `role` field
    pub fn all_roles(&self) -> Vec<String> {
        let mut roles = self.roles.clone();
        if let Some(role) = &self.role {
            if !roles.contains(role) {
                roles.push(role.clone());
            }
        }
        roles
    }
}
