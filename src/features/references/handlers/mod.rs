pub mod reference_handler;

pub use reference_handler::{__path_generate_reference, generate_reference};
