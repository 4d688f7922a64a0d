mod submission;

pub use submission::*;
