pub mod confirmation_handler;

pub use confirmation_handler::{__path_send_confirmation, send_confirmation};
