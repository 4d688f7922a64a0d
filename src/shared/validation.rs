use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating phone numbers entered on public forms
    /// Optional leading "+", then digits, spaces, parentheses or hyphens
    /// - Valid: "+235 66 12 34 56", "(235) 22-51-00", "66123456"
    /// - Invalid: "abc", "12", "+235 66 12 34 56 78 90 12"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9 ()\-]{6,20}$").unwrap();

    /// Regex for validating form codes used as reference prefixes
    /// Two to four upper-case ASCII letters
    /// - Valid: "CJ", "SC", "DA", "ABCD"
    /// - Invalid: "cj", "C", "ABCDE", "C1"
    pub static ref FORM_CODE_REGEX: Regex = Regex::new(r"^[A-Z]{2,4}$").unwrap();

    /// Regex for validating reference codes issued to citizens
    /// - Valid: "CJ-000042", "SC-12345678"
    /// - Invalid: "CJ42", "cj-000042", "CJ-12"
    pub static ref REFERENCE_REGEX: Regex = Regex::new(r"^[A-Z]{2,4}-\d{6,8}$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_regex() {
        assert!(PHONE_REGEX.is_match("+235 66 12 34 56"));
        assert!(PHONE_REGEX.is_match("(235) 22-51-00"));
        assert!(PHONE_REGEX.is_match("66123456"));
        assert!(!PHONE_REGEX.is_match("abc"));
        assert!(!PHONE_REGEX.is_match("12"));
        assert!(!PHONE_REGEX.is_match("+235 66 12 34 56 78 90 12"));
    }

    #[test]
    fn test_form_code_regex() {
        assert!(FORM_CODE_REGEX.is_match("CJ"));
        assert!(FORM_CODE_REGEX.is_match("ABCD"));
        assert!(!FORM_CODE_REGEX.is_match("cj"));
        assert!(!FORM_CODE_REGEX.is_match("C"));
        assert!(!FORM_CODE_REGEX.is_match("ABCDE"));
        assert!(!FORM_CODE_REGEX.is_match("C1"));
    }

    #[test]
    fn test_reference_regex() {
        assert!(REFERENCE_REGEX.is_match("CJ-000042"));
        assert!(REFERENCE_REGEX.is_match("SC-12345678"));
        assert!(!REFERENCE_REGEX.is_match("CJ42"));
        assert!(!REFERENCE_REGEX.is_match("cj-000042"));
        assert!(!REFERENCE_REGEX.is_match("CJ-12"));
    }
}
