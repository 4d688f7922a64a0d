mod confirmation_dto;

pub use confirmation_dto::*;
