//! Time-of-day extraction and normalization.
//!
//! Recognizes 12-hour forms with am/pm (with or without minutes and a
//! space before the marker) and bare 24-hour `HH:MM[:SS]` forms. Every
//! match normalizes to a `NaiveTime` rendered as `HH:MM:SS`.

use chrono::NaiveTime;
use regex::Regex;
use std::sync::LazyLock;

// The am/pm form must be tried first: "7:30 pm" also matches the bare
// 24-hour pattern as "7:30".
static AMPM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})(?::(\d{2})(?::(\d{2}))?)?\s*(am|pm)\b").unwrap()
});

static H24_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2}):(\d{2})(?::(\d{2}))?\b").unwrap());

/// Extract a time of day from `text`, normalized to 24-hour hour/minute/
/// second. Seconds default to zero unless explicitly given. 12am maps to
/// 00:00:00 and 12pm stays 12:00:00. Out-of-range fields simply fail to
/// match; absence is not an error.
pub fn extract_time(text: &str) -> Option<NaiveTime> {
    let lower = text.to_lowercase();

    if let Some(caps) = AMPM_RE.captures(&lower) {
        let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
        let minute: u32 = caps.get(2).map_or(Some(0), |m| m.as_str().parse().ok())?;
        let second: u32 = caps.get(3).map_or(Some(0), |m| m.as_str().parse().ok())?;
        if (1..=12).contains(&hour) {
            let hour = match (caps.get(4)?.as_str(), hour) {
                ("am", 12) => 0,
                ("am", h) => h,
                ("pm", 12) => 12,
                ("pm", h) => h + 12,
                _ => return None,
            };
            if let Some(time) = NaiveTime::from_hms_opt(hour, minute, second) {
                return Some(time);
            }
        }
    }

    if let Some(caps) = H24_RE.captures(&lower) {
        let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
        let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
        let second: u32 = caps.get(3).map_or(Some(0), |m| m.as_str().parse().ok())?;
        return NaiveTime::from_hms_opt(hour, minute, second);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    // ---- 12-hour forms ----

    #[test]
    fn test_hour_pm_no_space() {
        assert_eq!(extract_time("7pm"), Some(t(19, 0, 0)));
    }

    #[test]
    fn test_hour_pm_with_space() {
        assert_eq!(extract_time("7 pm"), Some(t(19, 0, 0)));
    }

    #[test]
    fn test_hour_minute_pm() {
        assert_eq!(extract_time("7:30 pm"), Some(t(19, 30, 0)));
    }

    #[test]
    fn test_hour_minute_second_pm() {
        assert_eq!(extract_time("7:30:15pm"), Some(t(19, 30, 15)));
    }

    #[test]
    fn test_hour_am() {
        assert_eq!(extract_time("9am"), Some(t(9, 0, 0)));
    }

    #[test]
    fn test_midnight_12am() {
        assert_eq!(extract_time("12am"), Some(t(0, 0, 0)));
    }

    #[test]
    fn test_noon_12pm() {
        assert_eq!(extract_time("12pm"), Some(t(12, 0, 0)));
    }

    #[test]
    fn test_uppercase_marker() {
        assert_eq!(extract_time("8 PM"), Some(t(20, 0, 0)));
    }

    // ---- 24-hour forms ----

    #[test]
    fn test_24h_hour_minute() {
        assert_eq!(extract_time("19:00"), Some(t(19, 0, 0)));
    }

    #[test]
    fn test_24h_hour_minute_second() {
        assert_eq!(extract_time("19:00:00"), Some(t(19, 0, 0)));
    }

    #[test]
    fn test_24h_single_digit_hour() {
        assert_eq!(extract_time("9:15"), Some(t(9, 15, 0)));
    }

    #[test]
    fn test_24h_midnight() {
        assert_eq!(extract_time("00:00"), Some(t(0, 0, 0)));
    }

    // ---- Normalization properties ----

    #[test]
    fn test_equivalent_forms_normalize_identically() {
        let expected = Some(t(19, 0, 0));
        assert_eq!(extract_time("7pm"), expected);
        assert_eq!(extract_time("7 pm"), expected);
        assert_eq!(extract_time("19:00"), expected);
        assert_eq!(extract_time("19:00:00"), expected);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let first = extract_time("7:30 pm").unwrap();
        let rendered = first.format("%H:%M:%S").to_string();
        assert_eq!(rendered, "19:30:00");
        assert_eq!(extract_time(&rendered), Some(first));
    }

    // ---- Rejection ----

    #[test]
    fn test_hour_over_23_is_no_match() {
        assert_eq!(extract_time("25:00"), None);
    }

    #[test]
    fn test_13pm_is_no_match() {
        assert_eq!(extract_time("13pm"), None);
    }

    #[test]
    fn test_minute_over_59_is_no_match() {
        assert_eq!(extract_time("19:75"), None);
    }

    #[test]
    fn test_no_time_in_text() {
        assert_eq!(extract_time("a table for four"), None);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(extract_time(""), None);
    }

    #[test]
    fn test_bare_number_is_not_a_time() {
        assert_eq!(extract_time("table for 7"), None);
    }

    // ---- Embedded in a sentence ----

    #[test]
    fn test_time_inside_sentence() {
        assert_eq!(
            extract_time("book a table for 4 people tomorrow at 7pm"),
            Some(t(19, 0, 0))
        );
    }

    #[test]
    fn test_first_time_wins() {
        assert_eq!(extract_time("either 6pm or 8pm"), Some(t(18, 0, 0)));
    }
}
