mod form_dto;
mod submission_dto;

pub use form_dto::*;
pub use submission_dto::*;
