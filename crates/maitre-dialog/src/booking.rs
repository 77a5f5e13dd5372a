//! Booking execution helpers: payload assembly and projection upkeep.

use maitre_core::{Booking, CustomerDetails, Slots};

use crate::api::{BookingRequest, BookingUpdate};
use crate::error::DialogError;

/// Cancellation reason sent with every cancel call. The service accepts
/// 1 through 5; no user-facing prompt selects one.
pub const DEFAULT_CANCELLATION_REASON: u8 = 1;

/// Assemble the booking payload from completed slots. Contact slots are
/// defaulted via [`CustomerDetails::from_slots`] so a booking never blocks
/// on missing contact details.
///
/// Fails only if a required slot is absent, which the orchestrator's
/// completion check rules out before calling.
pub fn build_booking_request(slots: &Slots) -> Result<BookingRequest, DialogError> {
    let (Some(date), Some(time), Some(party_size)) = (slots.date, slots.time, slots.party) else {
        return Err(DialogError::Validation(
            "I still need a date, time, and party size before booking.".to_string(),
        ));
    };

    Ok(BookingRequest {
        date,
        time,
        party_size,
        special_requests: String::new(),
        customer: CustomerDetails::from_slots(slots),
    })
}

/// Fold a successful modify into the client-side projection.
pub fn apply_update(booking: &mut Booking, update: &BookingUpdate) {
    if let Some(date) = update.date {
        booking.date = date;
    }
    if let Some(time) = update.time {
        booking.time = time;
    }
    if let Some(party_size) = update.party_size {
        booking.party_size = party_size;
    }
}
