//! One-shot entity scan over a turn of input.

use chrono::NaiveDate;
use maitre_core::ExtractedEntities;

use crate::{contact, date, party, time};

/// Run every extractor over `text` and bundle the results. `today` anchors
/// relative date expressions (callers pass the reference-timezone date).
pub fn extract_entities(text: &str, today: NaiveDate) -> ExtractedEntities {
    ExtractedEntities {
        date: date::extract_date(text, today),
        time: time::extract_time(text),
        party_size: party::extract_party_size(text),
        email: contact::extract_email(text),
        mobile: contact::extract_mobile(text),
        name: contact::extract_name(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 6).unwrap()
    }

    #[test]
    fn test_full_booking_sentence() {
        let e = extract_entities("book a table for 4 people tomorrow at 7pm", wednesday());
        assert_eq!(e.date, NaiveDate::from_ymd_opt(2025, 8, 7));
        assert_eq!(e.time, NaiveTime::from_hms_opt(19, 0, 0));
        assert_eq!(e.party_size, Some(4));
        assert!(e.name.is_none());
    }

    #[test]
    fn test_contact_details_sentence() {
        let e = extract_entities(
            "for 2 Ada, email ada@example.com, 07123456789",
            wednesday(),
        );
        assert_eq!(e.party_size, Some(2));
        assert_eq!(e.name.as_deref(), Some("Ada"));
        assert_eq!(e.email.as_deref(), Some("ada@example.com"));
        assert_eq!(e.mobile.as_deref(), Some("07123456789"));
    }

    #[test]
    fn test_nothing_extracted() {
        let e = extract_entities("hello there", wednesday());
        assert!(e.is_empty());
    }

    #[test]
    fn test_bare_answer_turn() {
        // Mid-flow answers like "8pm" carry exactly one entity.
        let e = extract_entities("8pm", wednesday());
        assert_eq!(e.time, NaiveTime::from_hms_opt(20, 0, 0));
        assert!(e.date.is_none());
        assert!(e.party_size.is_none());
    }
}
