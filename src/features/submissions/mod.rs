//! Public forms of the website and reference tracking.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/consultations` | No | Legal consultation request |
//! | POST | `/api/signalements` | No | Litigation report |
//! | POST | `/api/demandes-avis` | No | Legal opinion request |
//! | POST | `/api/contact` | No | Contact message |
//! | POST | `/api/candidatures` | No | Job application |
//! | GET | `/api/submissions/track/{reference}` | No | Status lookup |
//!
//! Each submission is rate limited per client, receives a reference and is
//! followed by a best-effort confirmation e-mail (except applications).

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::{PgSubmissionRepository, SubmissionRepository};
pub use services::SubmissionService;
