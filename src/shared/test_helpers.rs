//! In-memory doubles of the persistence and delivery ports, for unit and
//! router tests.

#![cfg(test)]
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, response::Response, Router};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::config::RateLimitSettings;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::newsletter::models::Subscription;
use crate::features::newsletter::NewsletterRepository;
use crate::features::notifications::models::OutgoingEmail;
use crate::features::notifications::transports::{EmailTransport, MailerError};
use crate::features::rate_limits::models::{
    RateLimitRecord, RateLimitingSettings, SecuritySetting,
};
use crate::features::rate_limits::stores::{RateLimitStore, SecuritySettingsStore, StoreError};
use crate::features::rate_limits::RateLimitService;
use crate::features::references::generators::{ReferenceError, ReferenceGenerator};
use crate::features::references::models::format_reference;
use crate::features::submissions::models::{
    Locale, NewSubmission, Submission, SubmissionFilter, SubmissionKind, SubmissionStatus,
    SubmissionUpdate,
};
use crate::features::submissions::SubmissionRepository;
use crate::shared::constants::{ROLE_ADMIN, ROLE_SUPER_ADMIN, SETTING_RATE_LIMITING};

// =============================================================================
// AUTH
// =============================================================================

pub fn create_super_admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        account_id: "test-admin-id".to_string(),
        email: Some("super@aje.td".to_string()),
        roles: vec![ROLE_SUPER_ADMIN.to_string()],
    }
}

pub fn create_admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        account_id: "test-admin-id".to_string(),
        email: Some("admin@aje.td".to_string()),
        roles: vec![ROLE_ADMIN.to_string()],
    }
}

async fn inject_super_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_super_admin_user());
    next.run(request).await
}

async fn inject_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_admin_user());
    next.run(request).await
}

pub fn with_super_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_super_admin_middleware))
}

pub fn with_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_admin_middleware))
}

// =============================================================================
// RATE LIMITING
// =============================================================================

#[derive(Default)]
pub struct InMemoryRateLimitStore {
    records: Mutex<Vec<RateLimitRecord>>,
}

impl InMemoryRateLimitStore {
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimitStore {
    async fn find_active(
        &self,
        identifier: &str,
        endpoint: &str,
        since: DateTime<Utc>,
    ) -> std::result::Result<Option<RateLimitRecord>, StoreError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|r| r.identifier == identifier && r.endpoint == endpoint)
            .filter(|r| r.window_start >= since)
            .max_by_key(|r| r.window_start)
            .cloned())
    }

    async fn insert_window(
        &self,
        identifier: &str,
        endpoint: &str,
        window_start: DateTime<Utc>,
    ) -> std::result::Result<RateLimitRecord, StoreError> {
        let record = RateLimitRecord {
            id: Uuid::new_v4(),
            identifier: identifier.to_string(),
            endpoint: endpoint.to_string(),
            window_start,
            request_count: 1,
        };
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn increment_below(
        &self,
        record: &RateLimitRecord,
        max_requests: i32,
    ) -> std::result::Result<Option<i32>, StoreError> {
        let mut records = self.records.lock().unwrap();
        let Some(stored) = records.iter_mut().find(|r| r.id == record.id) else {
            return Ok(None);
        };
        if stored.request_count >= max_requests {
            return Ok(None);
        }
        stored.request_count += 1;
        Ok(Some(stored.request_count))
    }

    async fn purge_before(&self, before: DateTime<Utc>) -> std::result::Result<u64, StoreError> {
        let mut records = self.records.lock().unwrap();
        let count = records.len();
        records.retain(|r| r.window_start >= before);
        Ok((count - records.len()) as u64)
    }
}

/// Store whose every call fails, as if the database were unreachable
pub struct FailingRateLimitStore;

#[async_trait]
impl RateLimitStore for FailingRateLimitStore {
    async fn find_active(
        &self,
        _identifier: &str,
        _endpoint: &str,
        _since: DateTime<Utc>,
    ) -> std::result::Result<Option<RateLimitRecord>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn insert_window(
        &self,
        _identifier: &str,
        _endpoint: &str,
        _window_start: DateTime<Utc>,
    ) -> std::result::Result<RateLimitRecord, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn increment_below(
        &self,
        _record: &RateLimitRecord,
        _max_requests: i32,
    ) -> std::result::Result<Option<i32>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn purge_before(&self, _before: DateTime<Utc>) -> std::result::Result<u64, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

pub struct InMemorySecuritySettings {
    settings: Mutex<HashMap<String, SecuritySetting>>,
    failing: bool,
}

impl InMemorySecuritySettings {
    pub fn empty() -> Self {
        Self {
            settings: Mutex::new(HashMap::new()),
            failing: false,
        }
    }

    pub fn with_rate_limiting(enabled: bool) -> Self {
        let store = Self::empty();
        store.settings.lock().unwrap().insert(
            SETTING_RATE_LIMITING.to_string(),
            SecuritySetting {
                setting_key: SETTING_RATE_LIMITING.to_string(),
                setting_value: serde_json::json!({ "enabled": enabled }),
                updated_at: Utc::now(),
                updated_by: None,
            },
        );
        store
    }

    pub fn failing() -> Self {
        Self {
            settings: Mutex::new(HashMap::new()),
            failing: true,
        }
    }
}

#[async_trait]
impl SecuritySettingsStore for InMemorySecuritySettings {
    async fn get(&self, key: &str) -> std::result::Result<Option<SecuritySetting>, StoreError> {
        if self.failing {
            return Err(StoreError::Unavailable("settings unavailable".to_string()));
        }
        Ok(self.settings.lock().unwrap().get(key).cloned())
    }

    async fn set_rate_limiting(
        &self,
        settings: RateLimitingSettings,
        updated_by: &str,
    ) -> std::result::Result<SecuritySetting, StoreError> {
        if self.failing {
            return Err(StoreError::Unavailable("settings unavailable".to_string()));
        }
        let setting = SecuritySetting {
            setting_key: SETTING_RATE_LIMITING.to_string(),
            setting_value: serde_json::json!({ "enabled": settings.enabled }),
            updated_at: Utc::now(),
            updated_by: Some(updated_by.to_string()),
        };
        self.settings
            .lock()
            .unwrap()
            .insert(SETTING_RATE_LIMITING.to_string(), setting.clone());
        Ok(setting)
    }
}

/// Limiter with default policies over an in-memory store
pub fn rate_limit_service(enabled: bool) -> (RateLimitService, Arc<InMemoryRateLimitStore>) {
    let store = Arc::new(InMemoryRateLimitStore::default());
    let service = RateLimitService::new(
        store.clone(),
        Arc::new(InMemorySecuritySettings::with_rate_limiting(enabled)),
        RateLimitSettings::defaults(),
    );
    (service, store)
}

// =============================================================================
// REFERENCES
// =============================================================================

#[derive(Default)]
pub struct InMemoryReferenceGenerator {
    counters: Mutex<HashMap<String, i64>>,
    empty: bool,
}

impl InMemoryReferenceGenerator {
    pub fn returning_empty() -> Self {
        Self {
            counters: Mutex::new(HashMap::new()),
            empty: true,
        }
    }
}

#[async_trait]
impl ReferenceGenerator for InMemoryReferenceGenerator {
    async fn generate(
        &self,
        _form_type: &str,
        form_code: &str,
    ) -> std::result::Result<String, ReferenceError> {
        if self.empty {
            return Ok(String::new());
        }
        let mut counters = self.counters.lock().unwrap();
        let next = counters.entry(form_code.to_string()).or_insert(0);
        *next += 1;
        Ok(format_reference(form_code, *next))
    }
}

pub struct FailingReferenceGenerator;

#[async_trait]
impl ReferenceGenerator for FailingReferenceGenerator {
    async fn generate(
        &self,
        _form_type: &str,
        _form_code: &str,
    ) -> std::result::Result<String, ReferenceError> {
        Err(ReferenceError::Database(sqlx::Error::PoolTimedOut))
    }
}

// =============================================================================
// E-MAIL
// =============================================================================

#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<OutgoingEmail>>,
    counter: AtomicUsize,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailTransport for RecordingTransport {
    async fn send(&self, email: &OutgoingEmail) -> std::result::Result<String, MailerError> {
        self.sent.lock().unwrap().push(email.clone());
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("msg-{}", n))
    }
}

pub struct FailingTransport;

#[async_trait]
impl EmailTransport for FailingTransport {
    async fn send(&self, _email: &OutgoingEmail) -> std::result::Result<String, MailerError> {
        Err(MailerError::Provider { status: 503 })
    }
}

// =============================================================================
// SUBMISSIONS
// =============================================================================

/// Rows are kept in insertion order; lists return them newest first
#[derive(Default)]
pub struct InMemorySubmissionRepository {
    rows: Mutex<Vec<(SubmissionKind, Submission)>>,
}

impl InMemorySubmissionRepository {
    pub fn count(&self, kind: SubmissionKind) -> usize {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .count()
    }
}

fn matches_filter(s: &Submission, filter: &SubmissionFilter) -> bool {
    let status_ok = filter.status.map_or(true, |status| s.status == status);
    let search_ok = filter
        .search
        .as_deref()
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty())
        .map_or(true, |q| {
            [&s.nom, &s.email, &s.reference]
                .iter()
                .any(|field| field.to_lowercase().contains(&q))
        });
    status_ok && search_ok
}

#[async_trait]
impl SubmissionRepository for InMemorySubmissionRepository {
    async fn insert(&self, kind: SubmissionKind, new: &NewSubmission) -> Result<Submission> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|(k, s)| *k == kind && s.reference == new.reference)
        {
            return Err(AppError::Conflict(format!(
                "Reference {} already in use",
                new.reference
            )));
        }
        let now = Utc::now();
        let submission = Submission {
            id: Uuid::now_v7(),
            reference: new.reference.clone(),
            nom: new.nom.clone(),
            email: new.email.clone(),
            telephone: new.telephone.clone(),
            organisation: new.organisation.clone(),
            subject: new.subject.clone(),
            content: new.content.clone(),
            details: new.details.clone(),
            locale: new.locale,
            status: SubmissionStatus::Nouveau,
            internal_notes: None,
            created_at: now,
            updated_at: now,
        };
        rows.push((kind, submission.clone()));
        Ok(submission)
    }

    async fn find_by_id(&self, kind: SubmissionKind, id: Uuid) -> Result<Option<Submission>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|(k, s)| *k == kind && s.id == id)
            .map(|(_, s)| s.clone()))
    }

    async fn find_by_reference(
        &self,
        kind: SubmissionKind,
        reference: &str,
    ) -> Result<Option<Submission>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(k, s)| *k == kind && s.reference == reference)
            .map(|(_, s)| s.clone()))
    }

    async fn list(
        &self,
        kind: SubmissionKind,
        filter: &SubmissionFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Submission>, i64)> {
        let rows = self.rows.lock().unwrap();
        let matching: Vec<Submission> = rows
            .iter()
            .rev()
            .filter(|(k, s)| *k == kind && matches_filter(s, filter))
            .map(|(_, s)| s.clone())
            .collect();
        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn update(
        &self,
        kind: SubmissionKind,
        id: Uuid,
        update: &SubmissionUpdate,
    ) -> Result<Option<Submission>> {
        let mut rows = self.rows.lock().unwrap();
        let Some((_, stored)) = rows.iter_mut().find(|(k, s)| {
            *k == kind && s.id == id && s.status == update.expected_status
        }) else {
            return Ok(None);
        };
        if let Some(status) = update.status {
            stored.status = status;
        }
        if let Some(notes) = &update.internal_notes {
            stored.internal_notes = Some(notes.clone());
        }
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }
}

// =============================================================================
// NEWSLETTER
// =============================================================================

#[derive(Default)]
pub struct InMemoryNewsletterRepository {
    rows: Mutex<Vec<Subscription>>,
}

#[async_trait]
impl NewsletterRepository for InMemoryNewsletterRepository {
    async fn subscribe(&self, email: &str, locale: Locale) -> Result<(Subscription, bool)> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = rows.iter().find(|s| s.email == email) {
            return Ok((existing.clone(), false));
        }
        let subscription = Subscription {
            id: Uuid::now_v7(),
            email: email.to_string(),
            locale,
            created_at: Utc::now(),
        };
        rows.push(subscription.clone());
        Ok((subscription, true))
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<Subscription>, i64)> {
        let rows = self.rows.lock().unwrap();
        let total = rows.len() as i64;
        let page = rows
            .iter()
            .rev()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }
}
