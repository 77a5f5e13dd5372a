//! Natural-language understanding for the booking assistant.
//!
//! Pure rule-based extractors (date, time, party size, contact details) and
//! an ordered keyword classifier. Nothing here touches session state; every
//! function is total over arbitrary input text.

pub mod contact;
pub mod date;
pub mod entities;
pub mod intent;
pub mod party;
pub mod time;

pub use contact::{extract_email, extract_mobile, extract_name};
pub use date::{extract_date, reference_today};
pub use entities::extract_entities;
pub use intent::{classify, classify_with_entities, rule_table};
pub use party::extract_party_size;
pub use time::extract_time;
