//! Confirmation e-mail templates.
//!
//! Templates are compiled into the binary and rendered with HTML
//! auto-escaping, since every substituted value comes from a public form.

use std::sync::OnceLock;

use minijinja::{context, Environment};

use crate::features::notifications::models::{ConfirmationEmail, OutgoingEmail};
use crate::features::notifications::transports::MailerError;

static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

const TEMPLATES: &[(&str, &str)] = &[
    (
        "_layout.html",
        include_str!("../../../../templates/emails/_layout.html"),
    ),
    (
        "contact.html",
        include_str!("../../../../templates/emails/contact.html"),
    ),
    (
        "avis.html",
        include_str!("../../../../templates/emails/avis.html"),
    ),
    (
        "consultation.html",
        include_str!("../../../../templates/emails/consultation.html"),
    ),
    (
        "signalement.html",
        include_str!("../../../../templates/emails/signalement.html"),
    ),
];

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();
    for &(name, source) in TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::error!("Failed to load e-mail template {}: {}", name, e);
        }
    }
    env
}

fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render the confirmation for `email.kind` into a ready-to-send message
pub fn render_confirmation(email: &ConfirmationEmail) -> Result<OutgoingEmail, MailerError> {
    let template = get_environment()
        .get_template(email.kind.template_name())
        .map_err(|e| MailerError::Template(e.to_string()))?;

    let html = template
        .render(context! {
            nom => &email.nom,
            reference => &email.reference,
            subject => email.data_field("subject"),
            organisation => email.data_field("organisation"),
            objet => email.data_field("objet"),
            urgence => email.data_field("urgence"),
        })
        .map_err(|e| MailerError::Template(e.to_string()))?;

    Ok(OutgoingEmail {
        to: email.email.clone(),
        subject: format!("{} - Réf. {}", email.kind.subject(), email.reference),
        html,
    })
}
