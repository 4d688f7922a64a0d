//! Reference codes handed to citizens for tracking their submissions.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/references` | No | Generate a reference for a form code |

pub mod dtos;
pub mod generators;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use generators::PgReferenceGenerator;
pub use services::ReferenceService;
