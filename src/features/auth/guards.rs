//! Role-based authorization guards for the admin console.
//!
//! - super_admin: everything, including security settings
//! - admin: triage and answer citizen submissions

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

fn authenticated(parts: &Parts) -> Result<&AuthenticatedUser, AppError> {
    parts
        .extensions
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))
}

/// Guard for checking if user is super admin.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireSuperAdmin(user): RequireSuperAdmin) { ... }
/// ```
pub struct RequireSuperAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireSuperAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticated(parts)?;

        if !user.is_super_admin() {
            return Err(AppError::Forbidden(
                "Super admin access required".to_string(),
            ));
        }

        Ok(RequireSuperAdmin(user.clone()))
    }
}

/// Guard for admin console access.
///
/// Allows users with "super_admin" or "admin" roles.
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticated(parts)?;

        if !user.has_admin_access() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(RequireAdmin(user.clone()))
    }
}
