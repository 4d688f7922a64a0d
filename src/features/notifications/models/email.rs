use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The four confirmation templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EmailKind {
    Contact,
    Avis,
    Consultation,
    Signalement,
}

impl EmailKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailKind::Contact => "contact",
            EmailKind::Avis => "avis",
            EmailKind::Consultation => "consultation",
            EmailKind::Signalement => "signalement",
        }
    }

    pub fn template_name(&self) -> &'static str {
        match self {
            EmailKind::Contact => "contact.html",
            EmailKind::Avis => "avis.html",
            EmailKind::Consultation => "consultation.html",
            EmailKind::Signalement => "signalement.html",
        }
    }

    pub fn subject(&self) -> &'static str {
        match self {
            EmailKind::Contact => "Nous avons bien reçu votre message",
            EmailKind::Avis => "Votre demande d'avis juridique a été enregistrée",
            EmailKind::Consultation => "Votre demande de consultation a été enregistrée",
            EmailKind::Signalement => "Votre signalement a été transmis",
        }
    }
}

impl std::fmt::Display for EmailKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confirmation sent to a citizen once their submission is stored
#[derive(Debug, Clone)]
pub struct ConfirmationEmail {
    pub kind: EmailKind,
    pub email: String,
    pub nom: String,
    pub reference: String,
    /// Extra submission fields; only `subject`, `organisation`, `objet` and `urgence` are used
    pub data: Option<serde_json::Value>,
}

impl ConfirmationEmail {
    /// String field of `data`, if present and non-empty
    pub fn data_field(&self, key: &str) -> Option<String> {
        self.data
            .as_ref()
            .and_then(|d| d.get(key))
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

/// Rendered message ready for a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Last four characters of a reference, safe to log
pub fn redact_reference(reference: &str) -> String {
    let chars: Vec<char> = reference.chars().collect();
    let start = chars.len().saturating_sub(4);
    format!("…{}", chars[start..].iter().collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_redact_reference_keeps_suffix_only() {
        assert_eq!(redact_reference("CJ-000042"), "…0042");
        assert_eq!(redact_reference("AB"), "…AB");
    }

    #[test]
    fn test_email_kind_serde() {
        let kind: EmailKind = serde_json::from_value(json!("signalement")).unwrap();
        assert_eq!(kind, EmailKind::Signalement);
        assert!(serde_json::from_value::<EmailKind>(json!("candidature")).is_err());
    }

    #[test]
    fn test_data_field_ignores_blank_and_non_string() {
        let email = ConfirmationEmail {
            kind: EmailKind::Avis,
            email: "a@b.td".to_string(),
            nom: "A".to_string(),
            reference: "DA-000001".to_string(),
            data: Some(json!({ "organisation": " Ministère ", "objet": "", "urgence": 3 })),
        };
        assert_eq!(email.data_field("organisation").as_deref(), Some("Ministère"));
        assert_eq!(email.data_field("objet"), None);
        assert_eq!(email.data_field("urgence"), None);
        assert_eq!(email.data_field("missing"), None);
    }
}
