use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Number of trailing epoch-millisecond digits used by fallback codes
const FALLBACK_DIGITS: u32 = 8;

/// Width of the zero-padded sequence in generated codes
const SEQUENCE_WIDTH: usize = 6;

/// Which tier produced a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceSource {
    Generated,
    Fallback,
}

/// A reference code handed to a citizen, tagged with the tier that issued it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssuedReference {
    /// Issued by the sequence-backed generator
    Generated(String),
    /// Synthesized locally after the generator failed; not guaranteed unique
    Fallback(String),
}

impl IssuedReference {
    pub fn code(&self) -> &str {
        match self {
            IssuedReference::Generated(code) | IssuedReference::Fallback(code) => code,
        }
    }

    pub fn source(&self) -> ReferenceSource {
        match self {
            IssuedReference::Generated(_) => ReferenceSource::Generated,
            IssuedReference::Fallback(_) => ReferenceSource::Fallback,
        }
    }

    pub fn into_code(self) -> String {
        match self {
            IssuedReference::Generated(code) | IssuedReference::Fallback(code) => code,
        }
    }
}

/// "CJ" + 42 -> "CJ-000042"
pub fn format_reference(form_code: &str, sequence: i64) -> String {
    format!("{}-{:0width$}", form_code, sequence, width = SEQUENCE_WIDTH)
}

/// Degraded-mode code: form code followed by the last 8 digits of epoch millis
pub fn fallback_reference(form_code: &str, now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis().unsigned_abs();
    let suffix = millis % 10u64.pow(FALLBACK_DIGITS);
    format!(
        "{}-{:0width$}",
        form_code,
        suffix,
        width = FALLBACK_DIGITS as usize
    )
}

/// Form code prefix of a reference ("SC-000001" -> "SC")
pub fn form_code_of(reference: &str) -> Option<&str> {
    reference.split_once('-').map(|(code, _)| code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::validation::REFERENCE_REGEX;
    use chrono::TimeZone;
    use regex::Regex;

    #[test]
    fn test_format_reference_pads_sequence() {
        assert_eq!(format_reference("CJ", 42), "CJ-000042");
        assert_eq!(format_reference("DA", 1_234_567), "DA-1234567");
        assert!(REFERENCE_REGEX.is_match(&format_reference("SC", 1)));
    }

    #[test]
    fn test_fallback_reference_uses_last_eight_digits() {
        let now = Utc.timestamp_millis_opt(1_767_225_600_123).unwrap();
        assert_eq!(fallback_reference("CJ", now), "CJ-25600123");
    }

    #[test]
    fn test_fallback_reference_matches_pattern() {
        let pattern = Regex::new(r"^CJ-\d{6,8}$").unwrap();
        for millis in [0_i64, 5, 1_000_000, 1_767_225_600_123] {
            let now = Utc.timestamp_millis_opt(millis).unwrap();
            assert!(pattern.is_match(&fallback_reference("CJ", now)));
        }
        assert!(pattern.is_match(&fallback_reference("CJ", Utc::now())));
    }

    #[test]
    fn test_issued_reference_accessors() {
        let generated = IssuedReference::Generated("CJ-000001".to_string());
        assert_eq!(generated.code(), "CJ-000001");
        assert_eq!(generated.source(), ReferenceSource::Generated);

        let fallback = IssuedReference::Fallback("CJ-12345678".to_string());
        assert_eq!(fallback.source(), ReferenceSource::Fallback);
        assert_eq!(fallback.into_code(), "CJ-12345678");
    }

    #[test]
    fn test_form_code_of() {
        assert_eq!(form_code_of("SC-000001"), Some("SC"));
        assert_eq!(form_code_of("nodash"), None);
    }
}
