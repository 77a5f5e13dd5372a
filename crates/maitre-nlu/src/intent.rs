//! Ordered keyword intent classification.
//!
//! The rule table is public data: rule order and precedence are part of the
//! contract and are asserted by tests, not implied by code layout. Keywords
//! match whole words (or whole phrases) in the lower-cased input, so "book"
//! does not fire inside "booking".

use regex::Regex;
use std::sync::LazyLock;

use maitre_core::{ExtractedEntities, Intent};

/// One classification rule: if any keyword matches, the rule's intent wins.
pub struct IntentRule {
    pub keywords: &'static [&'static str],
    pub intent: Intent,
}

// Availability words come first: they co-occur with booking words in natural
// phrasing ("book a table, what times are available") and the product wants
// users browsing before committing.
static RULES: &[IntentRule] = &[
    IntentRule {
        keywords: &[
            "available",
            "availability",
            "check",
            "search",
            "time",
            "slot",
            "when",
        ],
        intent: Intent::CheckAvailability,
    },
    IntentRule {
        keywords: &[
            "book",
            "reservation",
            "reserve",
            "make booking",
            "table for",
            "dinner",
            "lunch",
        ],
        intent: Intent::Book,
    },
    IntentRule {
        keywords: &[
            "my booking",
            "booking info",
            "reservation details",
            "show booking",
            "what time",
            "show my",
        ],
        intent: Intent::ShowBooking,
    },
    IntentRule {
        keywords: &["change", "modify", "update", "edit", "move"],
        intent: Intent::ModifyBooking,
    },
    IntentRule {
        keywords: &["cancel", "cancellation"],
        intent: Intent::CancelBooking,
    },
];

// Reset commands are matched ahead of the table so no keyword collision can
// ever shadow them.
static RESET_KEYWORDS: &[&str] = &["reset", "start over", "start again"];

static HELP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bhelp\b").unwrap());

static COMPILED_RULES: LazyLock<Vec<(Vec<Regex>, Intent)>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|rule| {
            let regexes = rule
                .keywords
                .iter()
                .map(|kw| Regex::new(&format!(r"\b{}\b", regex::escape(kw))).unwrap())
                .collect();
            (regexes, rule.intent)
        })
        .collect()
});

static COMPILED_RESET: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    RESET_KEYWORDS
        .iter()
        .map(|kw| Regex::new(&format!(r"\b{}\b", regex::escape(kw))).unwrap())
        .collect()
});

/// The ordered rule table, exposed so precedence can be tested as data.
pub fn rule_table() -> &'static [IntentRule] {
    RULES
}

/// Classify the intent of a raw message using keywords alone.
pub fn classify(text: &str) -> Intent {
    let lower = text.to_lowercase();

    if COMPILED_RESET.iter().any(|re| re.is_match(&lower)) {
        return Intent::Reset;
    }

    for (regexes, intent) in COMPILED_RULES.iter() {
        if regexes.iter().any(|re| re.is_match(&lower)) {
            return *intent;
        }
    }

    if HELP_RE.is_match(&lower) {
        return Intent::Help;
    }

    Intent::Unknown
}

/// Classify with the extractor results as a fallback signal: a turn that
/// matches no keyword but carries any entity is an implicit booking intent.
pub fn classify_with_entities(text: &str, entities: &ExtractedEntities) -> Intent {
    match classify(text) {
        Intent::Unknown if !entities.is_empty() => Intent::Book,
        intent => intent,
    }
}
