//! The slot-filling orchestrator.
//!
//! One `handle_message` call is one turn: classify and extract, offer the
//! turn to the active flow (explicit intents override it), fill or ask for
//! slots, and run the availability/booking calls once everything required
//! is present. The engine holds the session's lock for the whole turn, so
//! there is exactly one writer per session per turn.

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, info, warn};

use maitre_core::{AvailabilityContext, Booking, ExtractedEntities, FlowState, Intent, RequiredSlot, Session};
use maitre_nlu as nlu;

use crate::api::{BookingApi, BookingUpdate};
use crate::availability::{
    collect_alternatives, validate_cancellation_reason, validate_not_past, validate_party_size,
    Alternatives,
};
use crate::booking::{apply_update, build_booking_request, DEFAULT_CANCELLATION_REASON};
use crate::reply::{Reply, ReplyKind};
use crate::session::SessionStore;

/// How many availability times to list in a reply.
const LISTED_TIMES: usize = 5;

/// The dialogue engine. Generic over the booking API so tests script the
/// external service and the binary plugs in the HTTP client.
pub struct DialogEngine<A: BookingApi> {
    api: A,
    store: SessionStore,
    max_message_length: usize,
}

impl<A: BookingApi> DialogEngine<A> {
    pub fn new(api: A, max_message_length: usize) -> Self {
        Self {
            api,
            store: SessionStore::new(),
            max_message_length,
        }
    }

    /// Build with a preconfigured store (e.g. one with a TTL).
    pub fn with_store(api: A, store: SessionStore, max_message_length: usize) -> Self {
        Self {
            api,
            store,
            max_message_length,
        }
    }

    /// The session store, for host-level bookkeeping (counts, eviction).
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Process one turn for one session. Never fails: every outcome,
    /// including validation and API errors, is a [`Reply`].
    pub async fn handle_message(&self, session_id: &str, message: &str) -> Reply {
        let message = message.trim();
        if message.is_empty() {
            return Reply::new(ReplyKind::ValidationError, "Please enter a message.");
        }
        if message.len() > self.max_message_length {
            return Reply::new(
                ReplyKind::ValidationError,
                format!(
                    "Messages are limited to {} characters.",
                    self.max_message_length
                ),
            );
        }

        let today = nlu::reference_today();
        let entities = nlu::extract_entities(message, today);
        let intent = nlu::classify_with_entities(message, &entities);
        debug!(session_id, ?intent, "processing turn");

        let handle = self.store.get_or_create(session_id);
        let mut session = handle.lock().await;
        session.touch();

        match intent {
            Intent::Reset => {
                session.reset();
                Reply::new(
                    ReplyKind::Reset,
                    "Okay, we're starting fresh. What would you like to do?",
                )
            }
            Intent::Help => {
                session.clear_flow();
                Reply::new(ReplyKind::HelpShown, help_text())
            }
            Intent::CheckAvailability => {
                session.clear_flow();
                session.state = FlowState::InAvailabilityFlow;
                seed_slots(&mut session, &entities);
                self.advance_availability(&mut session, today).await
            }
            Intent::ShowBooking => {
                session.clear_flow();
                self.show_booking(&mut session).await
            }
            Intent::ModifyBooking => {
                session.clear_flow();
                self.modify_booking(&mut session, &entities, today).await
            }
            Intent::CancelBooking => {
                session.clear_flow();
                self.cancel_booking(&mut session).await
            }
            Intent::Book | Intent::Unknown => match session.state {
                FlowState::InBookingFlow => {
                    seed_slots(&mut session, &entities);
                    self.advance_booking(&mut session, today).await
                }
                FlowState::InAvailabilityFlow => {
                    self.continue_availability(&mut session, &entities, today)
                        .await
                }
                FlowState::Idle => {
                    if intent == Intent::Book {
                        session.state = FlowState::InBookingFlow;
                        seed_slots(&mut session, &entities);
                        self.advance_booking(&mut session, today).await
                    } else {
                        Reply::new(ReplyKind::Default, default_text())
                    }
                }
            },
        }
    }

    // -----------------------------------------------------------------
    // Availability flow
    // -----------------------------------------------------------------

    /// Ask for whatever the availability question still needs, then query.
    async fn advance_availability(&self, session: &mut Session, today: NaiveDate) -> Reply {
        let Some(date) = session.slots.date else {
            return Reply::new(
                ReplyKind::AskDate,
                "Happy to check availability. What date would you like to dine? \
                 You can say 'tomorrow', 'Friday', or 'August 20th'.",
            );
        };
        if let Err(err) = validate_not_past(date, today) {
            session.slots.date = None;
            return Reply::from_error(err);
        }
        let Some(party) = session.slots.party else {
            return Reply::new(
                ReplyKind::AskParty,
                format!(
                    "Got it, {} it is. How many people will be in your party?",
                    fmt_date(date)
                ),
            );
        };
        if let Err(err) = validate_party_size(party) {
            session.slots.party = None;
            return Reply::from_error(err);
        }

        match self.api.search_availability(date, party).await {
            Ok(response) => {
                let times = response.available_times();
                session.availability = Some(AvailabilityContext {
                    date,
                    party_size: party,
                    available_times: times.clone(),
                });
                let data = serde_json::to_value(&response).unwrap_or_default();
                if times.is_empty() {
                    Reply::with_data(
                        ReplyKind::NoAvailability,
                        format!(
                            "Sorry, there are no tables for {party} on {}. \
                             Would you like to try a different date?",
                            fmt_date(date)
                        ),
                        data,
                    )
                } else {
                    Reply::with_data(
                        ReplyKind::AvailabilityFound,
                        format!(
                            "Here's what's free for {party} on {}: {}. \
                             Would you like to book one of these times?",
                            fmt_date(date),
                            list_times(&times)
                        ),
                        data,
                    )
                }
            }
            Err(err) => {
                warn!(session_err = %err, "availability search failed");
                Reply::from_error(err)
            }
        }
    }

    /// A turn arriving while the availability flow is active. A fresh date
    /// re-runs the query; once results are cached, a time or party answer
    /// promotes the session into the booking flow, seeded from the cache.
    async fn continue_availability(
        &self,
        session: &mut Session,
        entities: &ExtractedEntities,
        today: NaiveDate,
    ) -> Reply {
        session.slots.merge_contacts(entities);

        if let Some(ctx) = session.availability.clone() {
            if entities.time.is_some() || entities.party_size.is_some() {
                session.state = FlowState::InBookingFlow;
                if session.slots.date.is_none() {
                    session.slots.date = Some(ctx.date);
                }
                if session.slots.party.is_none() {
                    session.slots.party = Some(ctx.party_size);
                }
                seed_slots(session, entities);
                return self.advance_booking(session, today).await;
            }
        }

        if let Some(date) = entities.date {
            session.slots.date = Some(date);
            // The cached result no longer answers the question being asked.
            session.availability = None;
        }
        if let Some(party) = entities.party_size {
            session.slots.party = Some(party);
        }
        self.advance_availability(session, today).await
    }

    // -----------------------------------------------------------------
    // Booking flow
    // -----------------------------------------------------------------

    /// Validate what's present, ask for the first missing required slot,
    /// and execute once the slots are complete.
    async fn advance_booking(&self, session: &mut Session, today: NaiveDate) -> Reply {
        if let Some(date) = session.slots.date {
            if let Err(err) = validate_not_past(date, today) {
                session.slots.date = None;
                return Reply::from_error(err);
            }
        }
        if let Some(party) = session.slots.party {
            if let Err(err) = validate_party_size(party) {
                session.slots.party = None;
                return Reply::from_error(err);
            }
        }

        match session.slots.first_missing() {
            Some(RequiredSlot::Date) => Reply::new(
                ReplyKind::AskDate,
                "What date would you like to dine? \
                 You can say 'tomorrow', 'Friday', or 'August 20th'.",
            ),
            Some(RequiredSlot::Time) => Reply::new(
                ReplyKind::AskTime,
                "What time would you like? For example '7:30 pm' or '19:30'.",
            ),
            Some(RequiredSlot::Party) => Reply::new(
                ReplyKind::AskParty,
                "How many people will be in your party?",
            ),
            None => self.execute_booking(session).await,
        }
    }

    /// All required slots are present: confirm the time is actually free,
    /// then place the booking.
    async fn execute_booking(&self, session: &mut Session) -> Reply {
        let (Some(date), Some(time), Some(party)) =
            (session.slots.date, session.slots.time, session.slots.party)
        else {
            // Unreachable behind the completion check; re-ask rather than panic.
            return Reply::new(ReplyKind::AskDate, "What date would you like to dine?");
        };

        let times = match &session.availability {
            Some(ctx) if ctx.matches(date, party) => ctx.available_times.clone(),
            _ => match self.api.search_availability(date, party).await {
                Ok(response) => {
                    let times = response.available_times();
                    session.availability = Some(AvailabilityContext {
                        date,
                        party_size: party,
                        available_times: times.clone(),
                    });
                    times
                }
                Err(err) => {
                    warn!(session_err = %err, "availability check before booking failed");
                    return Reply::from_error(err);
                }
            },
        };

        if times.is_empty() {
            session.slots.date = None;
            session.availability = None;
            return Reply::new(
                ReplyKind::NoAvailability,
                format!(
                    "Sorry, there are no tables for {party} on {}. \
                     Would you like to try a different date?",
                    fmt_date(date)
                ),
            );
        }

        if !times.contains(&time) {
            let alternatives = collect_alternatives(&self.api, date, party, &times).await;
            session.slots.time = None;
            let data = serde_json::to_value(&alternatives).unwrap_or_default();
            return Reply::with_data(
                ReplyKind::TimeUnavailable,
                describe_alternatives(time, date, &alternatives),
                data,
            );
        }

        let request = match build_booking_request(&session.slots) {
            Ok(request) => request,
            Err(err) => return Reply::from_error(err),
        };
        match self.api.create_booking(&request).await {
            Ok(confirmation) => {
                info!(reference = %confirmation.booking_reference, "booking created");
                session.slots.reference = Some(confirmation.booking_reference.clone());
                session.booking = Some(Booking {
                    reference: confirmation.booking_reference.clone(),
                    date,
                    time,
                    party_size: party,
                });
                session.availability = None;
                session.state = FlowState::Idle;
                let data = serde_json::to_value(&confirmation).unwrap_or_default();
                Reply::with_data(
                    ReplyKind::BookingCreated,
                    format!(
                        "Your table is booked! {} at {} for {party}, reference {}. \
                         You can say 'show my booking' or 'change it' anytime.",
                        fmt_date(date),
                        fmt_time(time),
                        confirmation.booking_reference
                    ),
                    data,
                )
            }
            // Flow state and slots stay put so the user can retry as-is.
            Err(err) => {
                warn!(session_err = %err, "booking call failed");
                Reply::from_error(err)
            }
        }
    }

    // -----------------------------------------------------------------
    // Current-booking operations
    // -----------------------------------------------------------------

    async fn show_booking(&self, session: &mut Session) -> Reply {
        let Some(booking) = session.booking.clone() else {
            return no_booking_reply();
        };

        match self.api.get_booking(&booking.reference).await {
            Ok(record) => {
                let email = record
                    .customer_email
                    .clone()
                    .unwrap_or_else(|| maitre_core::DEFAULT_CUSTOMER_EMAIL.to_string());
                let mobile = record
                    .customer_mobile
                    .clone()
                    .unwrap_or_else(|| maitre_core::DEFAULT_CUSTOMER_MOBILE.to_string());
                let data = serde_json::to_value(&record).unwrap_or_default();
                Reply::with_data(
                    ReplyKind::BookingInfoShown,
                    format!(
                        "Your booking {}: {} at {} for {}. Contact on file: {} / {}.",
                        booking.reference,
                        fmt_date(booking.date),
                        fmt_time(booking.time),
                        booking.party_size,
                        email,
                        mobile
                    ),
                    data,
                )
            }
            Err(err) => {
                warn!(session_err = %err, "booking lookup failed");
                Reply::from_error(err)
            }
        }
    }

    async fn modify_booking(
        &self,
        session: &mut Session,
        entities: &ExtractedEntities,
        today: NaiveDate,
    ) -> Reply {
        let Some(booking) = session.booking.clone() else {
            return no_booking_reply();
        };

        let update = BookingUpdate {
            date: entities.date,
            time: entities.time,
            party_size: entities.party_size,
        };
        if update.is_empty() {
            return Reply::new(
                ReplyKind::AskModification,
                "What would you like to change? You can give a new date, time, or party size.",
            );
        }
        if let Some(date) = update.date {
            if let Err(err) = validate_not_past(date, today) {
                return Reply::from_error(err);
            }
        }
        if let Some(party) = update.party_size {
            if let Err(err) = validate_party_size(party) {
                return Reply::from_error(err);
            }
        }

        match self.api.update_booking(&booking.reference, &update).await {
            Ok(record) => {
                if let Some(current) = session.booking.as_mut() {
                    apply_update(current, &update);
                }
                let updated = session.booking.clone().unwrap_or(booking);
                let data = serde_json::to_value(&record).unwrap_or_default();
                Reply::with_data(
                    ReplyKind::BookingModified,
                    format!(
                        "Done. Your booking {} is now {} at {} for {}.",
                        updated.reference,
                        fmt_date(updated.date),
                        fmt_time(updated.time),
                        updated.party_size
                    ),
                    data,
                )
            }
            Err(err) => {
                warn!(session_err = %err, "booking update failed");
                Reply::from_error(err)
            }
        }
    }

    async fn cancel_booking(&self, session: &mut Session) -> Reply {
        let Some(booking) = session.booking.clone() else {
            return no_booking_reply();
        };

        if let Err(err) = validate_cancellation_reason(DEFAULT_CANCELLATION_REASON) {
            return Reply::from_error(err);
        }

        match self
            .api
            .cancel_booking(&booking.reference, DEFAULT_CANCELLATION_REASON)
            .await
        {
            Ok(confirmation) => {
                info!(reference = %booking.reference, "booking cancelled");
                session.booking = None;
                Reply::with_data(
                    ReplyKind::BookingCancelled,
                    format!(
                        "Your booking {} for {} at {} has been cancelled. \
                         Would you like to make a new reservation?",
                        booking.reference,
                        fmt_date(booking.date),
                        fmt_time(booking.time)
                    ),
                    confirmation,
                )
            }
            Err(err) => {
                warn!(session_err = %err, "booking cancellation failed");
                Reply::from_error(err)
            }
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Copy this turn's entities into the session slots. Date/time/party
/// overwrite; contacts merge.
fn seed_slots(session: &mut Session, entities: &ExtractedEntities) {
    session.slots.merge_contacts(entities);
    if let Some(date) = entities.date {
        session.slots.date = Some(date);
    }
    if let Some(time) = entities.time {
        session.slots.time = Some(time);
    }
    if let Some(party) = entities.party_size {
        session.slots.party = Some(party);
    }
}

fn no_booking_reply() -> Reply {
    Reply::new(
        ReplyKind::NoBooking,
        "You don't have an active booking. Would you like to make a reservation?",
    )
}

fn fmt_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn fmt_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

fn list_times(times: &[NaiveTime]) -> String {
    let listed: Vec<String> = times.iter().take(LISTED_TIMES).map(|t| fmt_time(*t)).collect();
    let mut text = listed.join(", ");
    if times.len() > LISTED_TIMES {
        text.push_str(", ...");
    }
    text
}

fn describe_alternatives(time: NaiveTime, date: NaiveDate, alternatives: &Alternatives) -> String {
    let mut text = format!(
        "{} isn't available on {}.",
        fmt_time(time),
        fmt_date(date)
    );
    if alternatives.is_empty() {
        text.push_str(" I couldn't find nearby alternatives; would you like to try another date?");
        return text;
    }
    if !alternatives.requested_day.is_empty() {
        text.push_str(&format!(
            " Same day: {}.",
            list_times(&alternatives.requested_day)
        ));
    }
    for day in [&alternatives.previous_day, &alternatives.next_day] {
        if let (Some(date), false) = (day.date, day.times.is_empty()) {
            text.push_str(&format!(" On {}: {}.", fmt_date(date), list_times(&day.times)));
        }
    }
    text.push_str(" Which time would you like?");
    text
}

fn help_text() -> String {
    "Here's what I can help you with:\n\
     - Check availability: 'check availability for August 20th for 4 people'\n\
     - Make a booking: 'book a table for 2 tomorrow at 7pm'\n\
     - View your booking: 'show my booking'\n\
     - Modify it: 'change it to 8pm'\n\
     - Cancel it: 'cancel it'\n\
     You can also say 'reset' to start over."
        .to_string()
}

fn default_text() -> String {
    "Hi! I'm the restaurant booking assistant. I can check table availability, \
     make reservations, and show, modify, or cancel your booking. \
     Say 'help' for examples."
        .to_string()
}

// =============================================================================
// Tests
// =============================================================================
