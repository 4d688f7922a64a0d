mod submission_service;

pub use submission_service::{SubmissionReceipt, SubmissionService};
