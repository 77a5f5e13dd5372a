//! Contact-detail extraction: email, mobile number, and a best-effort name.

use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b").unwrap()
});

// Candidate digit runs, allowing internal spaces and dashes; the run is
// stripped and length-checked afterwards.
static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\d[\d\s\-]{8,}\d").unwrap());

// "for <N> <Word>" where the word is capitalized and not a quantifier or
// date word. Intentionally weak; a missed name just means the booking
// defaults to "Guest".
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[Ff]or\s+\d{1,3}\s+([A-Z][a-zA-Z]+)\b").unwrap());

const NAME_STOP_WORDS: &[&str] = &[
    "people", "person", "persons", "guest", "guests", "pax", "seat", "seats", "party",
    "today", "tomorrow", "tonight", "monday", "tuesday", "wednesday", "thursday",
    "friday", "saturday", "sunday",
];

/// Extract an email address.
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_lowercase())
}

/// Extract a mobile number: an optional `+` followed by 10 to 14 digits
/// once whitespace and dashes are stripped.
pub fn extract_mobile(text: &str) -> Option<String> {
    for m in MOBILE_RE.find_iter(text) {
        let raw = m.as_str();
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if (10..=14).contains(&digits.len()) {
            let normalized = if raw.starts_with('+') {
                format!("+{digits}")
            } else {
                digits
            };
            return Some(normalized);
        }
    }
    None
}

/// Extract a customer name from the "for N <Word>" phrasing.
pub fn extract_name(text: &str) -> Option<String> {
    for caps in NAME_RE.captures_iter(text) {
        let word = caps.get(1)?.as_str();
        if !NAME_STOP_WORDS.contains(&word.to_lowercase().as_str()) {
            return Some(word.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Email ----

    #[test]
    fn test_plain_email() {
        assert_eq!(
            extract_email("reach me at ada@example.com please"),
            Some("ada@example.com".to_string())
        );
    }

    #[test]
    fn test_email_with_plus_and_dots() {
        assert_eq!(
            extract_email("ada.lovelace+dinner@mail.example.co.uk"),
            Some("ada.lovelace+dinner@mail.example.co.uk".to_string())
        );
    }

    #[test]
    fn test_email_lowercased() {
        assert_eq!(
            extract_email("Ada@Example.COM"),
            Some("ada@example.com".to_string())
        );
    }

    #[test]
    fn test_no_email() {
        assert_eq!(extract_email("no address here"), None);
    }

    // ---- Mobile ----

    #[test]
    fn test_plain_mobile() {
        assert_eq!(
            extract_mobile("my number is 07123456789"),
            Some("07123456789".to_string())
        );
    }

    #[test]
    fn test_mobile_with_country_code() {
        assert_eq!(
            extract_mobile("+44 7123 456 789"),
            Some("+447123456789".to_string())
        );
    }

    #[test]
    fn test_mobile_with_dashes() {
        assert_eq!(
            extract_mobile("071-2345-6789"),
            Some("07123456789".to_string())
        );
    }

    #[test]
    fn test_too_short_run_ignored() {
        assert_eq!(extract_mobile("123456789"), None);
    }

    #[test]
    fn test_too_long_run_ignored() {
        assert_eq!(extract_mobile("123456789012345"), None);
    }

    #[test]
    fn test_no_mobile() {
        assert_eq!(extract_mobile("call me maybe"), None);
    }

    // ---- Name ----

    #[test]
    fn test_name_after_party_count() {
        assert_eq!(
            extract_name("a table for 2 Ada"),
            Some("Ada".to_string())
        );
    }

    #[test]
    fn test_quantifier_noun_is_not_a_name() {
        assert_eq!(extract_name("a table for 2 People"), None);
    }

    #[test]
    fn test_lowercase_word_is_not_a_name() {
        assert_eq!(extract_name("a table for 2 tomorrow"), None);
        assert_eq!(extract_name("for 2 people"), None);
    }

    #[test]
    fn test_date_word_is_not_a_name() {
        assert_eq!(extract_name("a table for 2 Tomorrow"), None);
        assert_eq!(extract_name("for 4 Friday"), None);
    }

    #[test]
    fn test_name_after_quantified_phrase_is_missed() {
        // Known miss: only the word directly after the number is considered.
        assert_eq!(extract_name("for 2 people under Ada"), None);
    }

    #[test]
    fn test_no_name() {
        assert_eq!(extract_name("book a table"), None);
    }

    #[test]
    fn test_name_preserves_case() {
        assert_eq!(
            extract_name("for 4 Grace tonight"),
            Some("Grace".to_string())
        );
    }
}
