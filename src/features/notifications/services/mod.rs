mod confirmation_mailer;
mod templates;

pub use confirmation_mailer::ConfirmationMailer;
pub use templates::render_confirmation;
