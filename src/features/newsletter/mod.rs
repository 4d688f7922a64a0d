//! Newsletter subscriptions.
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/newsletter` | No | Subscribe an address |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::{NewsletterRepository, PgNewsletterRepository};
pub use services::NewsletterService;
