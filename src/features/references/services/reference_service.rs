use std::sync::Arc;

use chrono::Utc;

use crate::core::error::{AppError, Result};
use crate::features::references::generators::{ReferenceError, ReferenceGenerator};
use crate::features::references::models::{fallback_reference, IssuedReference};
use crate::shared::validation::FORM_CODE_REGEX;

/// Issues citizen-facing reference codes.
///
/// The generator is tried first; if it fails or returns nothing, a local
/// timestamp-based code is synthesized instead.
pub struct ReferenceService {
    generator: Arc<dyn ReferenceGenerator>,
}

impl ReferenceService {
    pub fn new(generator: Arc<dyn ReferenceGenerator>) -> Self {
        Self { generator }
    }

    /// Call the generator only, surfacing its failure
    pub async fn generate(&self, form_type: &str, form_code: &str) -> Result<String> {
        if !FORM_CODE_REGEX.is_match(form_code) {
            return Err(AppError::Validation(format!(
                "Invalid form code '{}': expected 2-4 upper-case letters",
                form_code
            )));
        }

        self.try_generate(form_type, form_code)
            .await
            .map_err(|e| {
                tracing::error!("Reference generation failed for {}: {:?}", form_code, e);
                AppError::Internal("Reference generation failed".to_string())
            })
    }

    async fn try_generate(
        &self,
        form_type: &str,
        form_code: &str,
    ) -> std::result::Result<String, ReferenceError> {
        let reference = self.generator.generate(form_type, form_code).await?;
        if reference.trim().is_empty() {
            return Err(ReferenceError::Empty);
        }
        Ok(reference)
    }

    /// Issue a reference, falling back to a local code when the generator fails
    pub async fn issue(&self, form_type: &str, form_code: &str) -> IssuedReference {
        match self.try_generate(form_type, form_code).await {
            Ok(reference) => IssuedReference::Generated(reference),
            Err(e) => {
                let reference = fallback_reference(form_code, Utc::now());
                tracing::warn!(
                    "Reference generator unavailable for form '{}', using fallback: {}",
                    form_type,
                    e
                );
                IssuedReference::Fallback(reference)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::references::models::ReferenceSource;
    use crate::shared::test_helpers::{FailingReferenceGenerator, InMemoryReferenceGenerator};
    use regex::Regex;

    #[tokio::test]
    async fn test_issue_uses_generator() {
        let service = ReferenceService::new(Arc::new(InMemoryReferenceGenerator::default()));

        let first = service.issue("consultation", "CJ").await;
        let second = service.issue("consultation", "CJ").await;
        let other = service.issue("signalement", "SC").await;

        assert_eq!(first, IssuedReference::Generated("CJ-000001".to_string()));
        assert_eq!(second.code(), "CJ-000002");
        assert_eq!(other.code(), "SC-000001");
    }

    #[tokio::test]
    async fn test_issue_falls_back_when_generator_unreachable() {
        let service = ReferenceService::new(Arc::new(FailingReferenceGenerator));
        let pattern = Regex::new(r"^CJ-\d{6,8}$").unwrap();

        let issued = service.issue("consultation", "CJ").await;
        assert_eq!(issued.source(), ReferenceSource::Fallback);
        assert!(pattern.is_match(issued.code()));
    }

    #[tokio::test]
    async fn test_issue_falls_back_on_empty_reference() {
        let service = ReferenceService::new(Arc::new(InMemoryReferenceGenerator::returning_empty()));

        let issued = service.issue("avis", "DA").await;
        assert_eq!(issued.source(), ReferenceSource::Fallback);
        assert!(issued.code().starts_with("DA-"));
    }

    #[tokio::test]
    async fn test_generate_rejects_malformed_form_code() {
        let service = ReferenceService::new(Arc::new(InMemoryReferenceGenerator::default()));
        assert!(matches!(
            service.generate("consultation", "cj").await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_generate_surfaces_generator_failure() {
        let service = ReferenceService::new(Arc::new(FailingReferenceGenerator));
        assert!(matches!(
            service.generate("consultation", "CJ").await,
            Err(AppError::Internal(_))
        ));
    }
}
