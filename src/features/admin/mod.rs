//! Admin console API: triage of public submissions and newsletter export.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/admin/submissions/{kind}` | Admin | List with status/search filters |
//! | GET | `/api/admin/submissions/{kind}/{id}` | Admin | Get one submission |
//! | PATCH | `/api/admin/submissions/{kind}/{id}` | Admin | Update status and notes |
//! | GET | `/api/admin/newsletter` | Admin | List subscriptions |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::AdminService;
