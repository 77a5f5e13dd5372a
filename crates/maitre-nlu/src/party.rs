//! Party-size extraction.
//!
//! Quantifier phrases ("4 people", "party of 6", "table for 2") are tried
//! first and return whatever number was written; range enforcement is the
//! validator's job. The fallback accepts only a standalone integer in
//! [1, 12] so phone numbers, years, and zero-padded date fragments are
//! never misread as a party size.

use regex::Regex;
use std::sync::LazyLock;

static QUANTIFIER_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b(\d{1,3})\s*(?:people|persons?|guests?|pax|seats?)\b",
        r"\bparty\s+of\s+(\d{1,3})\b",
        r"\btable\s+for\s+(\d{1,3})\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static STANDALONE_INT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})\b").unwrap());

const FALLBACK_MIN: u32 = 1;
const FALLBACK_MAX: u32 = 12;

/// Extract a party size from `text`.
pub fn extract_party_size(text: &str) -> Option<u32> {
    let lower = text.to_lowercase();

    for re in QUANTIFIER_RES.iter() {
        if let Some(caps) = re.captures(&lower) {
            if let Ok(size) = caps[1].parse::<u32>() {
                return Some(size);
            }
        }
    }

    for caps in STANDALONE_INT_RE.captures_iter(&lower) {
        let token = &caps[1];
        // Zero-padded tokens are date fragments ("08" in 2025-08-06), not
        // party sizes.
        if token.len() > 1 && token.starts_with('0') {
            continue;
        }
        if let Ok(size) = token.parse::<u32>() {
            if (FALLBACK_MIN..=FALLBACK_MAX).contains(&size) {
                return Some(size);
            }
        }
    }

    None
}
