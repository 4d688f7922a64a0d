use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::admin::{dtos as admin_dtos, handlers as admin_handlers};
use crate::features::auth;
use crate::features::newsletter::{dtos as newsletter_dtos, handlers as newsletter_handlers};
use crate::features::notifications::{
    dtos as notifications_dtos, handlers as notifications_handlers,
    models as notifications_models,
};
use crate::features::rate_limits::{dtos as rate_limits_dtos, handlers as rate_limits_handlers};
use crate::features::references::{
    dtos as references_dtos, handlers as references_handlers, models as references_models,
};
use crate::features::submissions::{
    dtos as submissions_dtos, handlers as submissions_handlers, models as submissions_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handler::get_me,
        // Submissions (public)
        submissions_handlers::create_consultation,
        submissions_handlers::create_signalement,
        submissions_handlers::create_demande_avis,
        submissions_handlers::create_contact,
        submissions_handlers::create_candidature,
        submissions_handlers::track_submission,
        // Newsletter (public)
        newsletter_handlers::subscribe,
        // References (public)
        references_handlers::generate_reference,
        // Notifications (public)
        notifications_handlers::send_confirmation,
        // Security settings (admin)
        rate_limits_handlers::get_rate_limiting_setting,
        rate_limits_handlers::update_rate_limiting_setting,
        // Admin
        admin_handlers::list_submissions,
        admin_handlers::get_submission,
        admin_handlers::update_submission,
        admin_handlers::list_newsletter,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::dto::MeResponseDto,
            auth::model::AuthenticatedUser,
            ApiResponse<auth::dto::MeResponseDto>,
            // Submissions
            submissions_models::SubmissionKind,
            submissions_models::SubmissionStatus,
            submissions_models::Locale,
            submissions_dtos::Urgence,
            submissions_dtos::CreateConsultationDto,
            submissions_dtos::CreateSignalementDto,
            submissions_dtos::CreateAvisDto,
            submissions_dtos::CreateContactDto,
            submissions_dtos::CreateCandidatureDto,
            submissions_dtos::SubmissionCreatedDto,
            submissions_dtos::TrackingResponseDto,
            ApiResponse<submissions_dtos::SubmissionCreatedDto>,
            ApiResponse<submissions_dtos::TrackingResponseDto>,
            // Newsletter
            newsletter_dtos::SubscribeDto,
            newsletter_dtos::SubscriptionResponseDto,
            ApiResponse<newsletter_dtos::SubscriptionResponseDto>,
            // References
            references_models::ReferenceSource,
            references_dtos::GenerateReferenceDto,
            references_dtos::ReferenceResponseDto,
            ApiResponse<references_dtos::ReferenceResponseDto>,
            // Notifications
            notifications_models::EmailKind,
            notifications_dtos::SendConfirmationDto,
            notifications_dtos::ConfirmationResponseDto,
            ApiResponse<notifications_dtos::ConfirmationResponseDto>,
            // Security settings
            rate_limits_dtos::RateLimitingSettingDto,
            rate_limits_dtos::UpdateRateLimitingSettingDto,
            ApiResponse<rate_limits_dtos::RateLimitingSettingDto>,
            // Admin
            admin_dtos::AdminSubmissionDto,
            admin_dtos::UpdateSubmissionDto,
            admin_dtos::AdminSubscriptionDto,
            ApiResponse<Vec<admin_dtos::AdminSubmissionDto>>,
            ApiResponse<admin_dtos::AdminSubmissionDto>,
            ApiResponse<Vec<admin_dtos::AdminSubscriptionDto>>,
        )
    ),
    tags(
        (name = "auth", description = "Admin console identity"),
        (name = "submissions", description = "Public forms and reference tracking"),
        (name = "newsletter", description = "Newsletter subscription (public)"),
        (name = "references", description = "Tracking reference generation (public)"),
        (name = "notifications", description = "Confirmation e-mails (public)"),
        (name = "security-settings", description = "Rate limiting toggle (admin)"),
        (name = "admin", description = "Submission triage (admin)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "AJE Tchad API",
        version = "0.1.0",
        description = "API of the Agence Judiciaire de l'État public website",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
