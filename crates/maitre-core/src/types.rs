//! Core domain types shared across the maitre crates.
//!
//! Everything here is plain data: the dialogue engine owns the behavior,
//! these types only carry state between its components.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// The user's current high-level goal, as produced by the intent classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    CheckAvailability,
    Book,
    ShowBooking,
    ModifyBooking,
    CancelBooking,
    Help,
    Reset,
    Unknown,
}

impl Intent {
    /// Whether this intent always overrides an in-progress flow.
    ///
    /// `Book` is deliberately not explicit: while a flow is active, booking
    /// words feed the continuation path instead of restarting the flow.
    pub fn is_explicit(self) -> bool {
        matches!(
            self,
            Intent::CheckAvailability
                | Intent::ShowBooking
                | Intent::ModifyBooking
                | Intent::CancelBooking
                | Intent::Help
                | Intent::Reset
        )
    }
}

/// Dialogue flow state for one session. At most one flow is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    #[default]
    Idle,
    InAvailabilityFlow,
    InBookingFlow,
}

/// The required booking slots, in the order the engine asks for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredSlot {
    Date,
    Time,
    Party,
}

/// Slot values collected across turns. Fixed keys, all optional.
///
/// `date`, `time`, and `party` are required to complete a booking;
/// the contact slots default at booking time and `reference` is filled
/// by a successful booking call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slots {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub party: Option<u32>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub reference: Option<String>,
}

impl Slots {
    /// First missing required slot in ask order: date, then time, then party.
    pub fn first_missing(&self) -> Option<RequiredSlot> {
        if self.date.is_none() {
            Some(RequiredSlot::Date)
        } else if self.time.is_none() {
            Some(RequiredSlot::Time)
        } else if self.party.is_none() {
            Some(RequiredSlot::Party)
        } else {
            None
        }
    }

    /// Whether all required slots are filled.
    pub fn is_complete(&self) -> bool {
        self.first_missing().is_none()
    }

    /// Absorb any contact entities from the current turn. Contact slots are
    /// optional, so a later mention simply overwrites an earlier one.
    pub fn merge_contacts(&mut self, entities: &ExtractedEntities) {
        if let Some(name) = &entities.name {
            self.name = Some(name.clone());
        }
        if let Some(email) = &entities.email {
            self.email = Some(email.clone());
        }
        if let Some(mobile) = &entities.mobile {
            self.mobile = Some(mobile.clone());
        }
    }

    pub fn clear(&mut self) {
        *self = Slots::default();
    }
}

/// Entities extracted from a single turn of raw text. Transient: never
/// stored, only merged into session slots by the orchestrator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedEntities {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub party_size: Option<u32>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub name: Option<String>,
}

impl ExtractedEntities {
    /// True when no extractor matched anything. Backs the classifier's
    /// implicit-booking fallback.
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.time.is_none()
            && self.party_size.is_none()
            && self.email.is_none()
            && self.mobile.is_none()
            && self.name.is_none()
    }
}

/// One slot returned by the availability endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub time: NaiveTime,
    pub available: bool,
}

/// Cached result of the most recent availability query. Bridges a
/// check-availability flow into a booking flow without re-querying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityContext {
    pub date: NaiveDate,
    pub party_size: u32,
    pub available_times: Vec<NaiveTime>,
}

impl AvailabilityContext {
    /// Whether this cache answers an availability question for the given
    /// date and party size.
    pub fn matches(&self, date: NaiveDate, party_size: u32) -> bool {
        self.date == date && self.party_size == party_size
    }
}

/// Client-side projection of the externally authoritative booking record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub reference: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub party_size: u32,
}

/// Customer fields sent with a booking request. Absent contact slots are
/// defaulted so a booking never blocks on missing contact details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub first_name: String,
    pub surname: String,
    pub email: String,
    pub mobile: String,
}

pub const DEFAULT_CUSTOMER_NAME: &str = "Guest";
pub const DEFAULT_CUSTOMER_EMAIL: &str = "guest@example.com";
pub const DEFAULT_CUSTOMER_MOBILE: &str = "07000000000";

impl CustomerDetails {
    /// Build customer details from the session slots, defaulting anything
    /// missing. A one-word name becomes the first name; anything after the
    /// first space becomes the surname.
    pub fn from_slots(slots: &Slots) -> Self {
        let (first_name, surname) = match slots.name.as_deref() {
            Some(full) => match full.split_once(' ') {
                Some((first, rest)) => (first.to_string(), rest.to_string()),
                None => (full.to_string(), DEFAULT_CUSTOMER_NAME.to_string()),
            },
            None => (
                DEFAULT_CUSTOMER_NAME.to_string(),
                DEFAULT_CUSTOMER_NAME.to_string(),
            ),
        };

        Self {
            first_name,
            surname,
            email: slots
                .email
                .clone()
                .unwrap_or_else(|| DEFAULT_CUSTOMER_EMAIL.to_string()),
            mobile: slots
                .mobile
                .clone()
                .unwrap_or_else(|| DEFAULT_CUSTOMER_MOBILE.to_string()),
        }
    }
}

/// One conversational identity's state. Created lazily on first contact,
/// mutated once per turn by the orchestrator, never expired automatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub state: FlowState,
    pub slots: Slots,
    pub availability: Option<AvailabilityContext>,
    pub booking: Option<Booking>,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            state: FlowState::Idle,
            slots: Slots::default(),
            availability: None,
            booking: None,
            created_at: now,
            last_active_at: now,
        }
    }

    /// Clear the session back to its initial empty state. The creation
    /// timestamp survives; everything else, including the booking
    /// projection, is dropped.
    pub fn reset(&mut self) {
        self.state = FlowState::Idle;
        self.slots.clear();
        self.availability = None;
        self.booking = None;
    }

    /// Leave any active flow without touching the booking projection.
    /// Used when an explicit intent overrides an in-progress flow.
    pub fn clear_flow(&mut self) {
        self.state = FlowState::Idle;
        self.slots.clear();
        self.availability = None;
    }

    pub fn touch(&mut self) {
        self.last_active_at = Utc::now();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
