//! Confirmation e-mails for public submissions.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/notifications/confirmation` | No | Render and send a confirmation |
//!
//! Without `RESEND_API_KEY` messages go to [`LogTransport`].

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod transports;

pub use services::ConfirmationMailer;
pub use transports::{EmailTransport, LogTransport, ResendTransport};
