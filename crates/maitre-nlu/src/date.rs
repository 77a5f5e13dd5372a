//! Calendar-date extraction from free text.
//!
//! Relative expressions resolve against a caller-supplied `today` so the
//! extractor stays pure; the engine passes the current date in the
//! reference timezone (Europe/London).

use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use chrono_tz::Europe::London;
use regex::Regex;
use std::sync::LazyLock;

struct DatePatterns {
    today: Regex,
    tomorrow: Regex,
    weekend: Regex,
    weekday: Regex,
    month_then_day: Regex,
    day_then_month: Regex,
    iso: Regex,
}

const MONTHS: &str = "january|february|march|april|may|june|july|august|september|october|\
                      november|december|jan|feb|mar|apr|jun|jul|aug|sep|oct|nov|dec";

static DATE_PATTERNS: LazyLock<DatePatterns> = LazyLock::new(|| DatePatterns {
    today: Regex::new(r"\btoday\b").unwrap(),
    tomorrow: Regex::new(r"\b(?:tomorrow|tmr)\b").unwrap(),
    weekend: Regex::new(r"\bthis\s+weekend\b").unwrap(),
    weekday: Regex::new(
        r"\b(?:(?:next|on)\s+)?(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b",
    )
    .unwrap(),
    month_then_day: Regex::new(&format!(
        r"\b({MONTHS})\s+(\d{{1,2}})(?:st|nd|rd|th)?\b"
    ))
    .unwrap(),
    day_then_month: Regex::new(&format!(
        r"\b(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?({MONTHS})\b"
    ))
    .unwrap(),
    iso: Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").unwrap(),
});

/// Today's date in the reference timezone.
pub fn reference_today() -> NaiveDate {
    Utc::now().with_timezone(&London).date_naive()
}

/// Extract a calendar date from `text`, resolving relative expressions
/// against `today`.
///
/// Patterns are tried in priority order: "today", "tomorrow"/"tmr",
/// "this weekend", weekday names, month-name + day, ISO `YYYY-MM-DD`.
/// The first match wins. Past dates are not rejected here; that guard
/// belongs to the availability resolver.
pub fn extract_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let lower = text.to_lowercase();
    let pats = &*DATE_PATTERNS;

    if pats.today.is_match(&lower) {
        return Some(today);
    }

    if pats.tomorrow.is_match(&lower) {
        return Some(today + Duration::days(1));
    }

    // "this weekend" means the upcoming Saturday; today when today is one.
    if pats.weekend.is_match(&lower) {
        let until_saturday = (Weekday::Sat.num_days_from_monday() as i64
            - today.weekday().num_days_from_monday() as i64
            + 7)
            % 7;
        return Some(today + Duration::days(until_saturday));
    }

    if let Some(caps) = pats.weekday.captures(&lower) {
        let target = parse_weekday(caps.get(1)?.as_str())?;
        // A zero delta always jumps a full week, for "next", "on", and the
        // bare weekday alike: naming today's weekday means next week's.
        let mut delta = (target.num_days_from_monday() as i64
            - today.weekday().num_days_from_monday() as i64
            + 7)
            % 7;
        if delta == 0 {
            delta = 7;
        }
        return Some(today + Duration::days(delta));
    }

    if let Some(caps) = pats.month_then_day.captures(&lower) {
        let month = parse_month(caps.get(1)?.as_str())?;
        let day: u32 = caps.get(2)?.as_str().parse().ok()?;
        if let Some(date) = month_day_this_year_or_next(month, day, today) {
            return Some(date);
        }
    }

    if let Some(caps) = pats.day_then_month.captures(&lower) {
        let day: u32 = caps.get(1)?.as_str().parse().ok()?;
        let month = parse_month(caps.get(2)?.as_str())?;
        if let Some(date) = month_day_this_year_or_next(month, day, today) {
            return Some(date);
        }
    }

    if let Some(caps) = pats.iso.captures(&lower) {
        let year: i32 = caps.get(1)?.as_str().parse().ok()?;
        let month: u32 = caps.get(2)?.as_str().parse().ok()?;
        let day: u32 = caps.get(3)?.as_str().parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}

/// Resolve a month/day pair to this year, rolling forward to next year when
/// the date has already passed. Returns `None` for impossible days.
fn month_day_this_year_or_next(month: u32, day: u32, today: NaiveDate) -> Option<NaiveDate> {
    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if this_year < today {
        NaiveDate::from_ymd_opt(today.year() + 1, month, day)
    } else {
        Some(this_year)
    }
}

fn parse_weekday(name: &str) -> Option<Weekday> {
    match name {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

fn parse_month(name: &str) -> Option<u32> {
    match &name[..3] {
        "jan" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "apr" => Some(4),
        "may" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "aug" => Some(8),
        "sep" => Some(9),
        "oct" => Some(10),
        "nov" => Some(11),
        "dec" => Some(12),
        _ => None,
    }
}
