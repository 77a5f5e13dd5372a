//! The engine's view of the external reservation service.
//!
//! `BookingApi` is the seam between the dialogue core and the transport:
//! the engine only ever sees these typed requests and responses, and the
//! HTTP client crate owns URLs, headers, and encodings.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use maitre_core::{AvailabilitySlot, CustomerDetails};

use crate::error::DialogError;

/// Response of an availability search for one date and party size.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    #[serde(default)]
    pub available_slots: Vec<AvailabilitySlot>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AvailabilityResponse {
    /// The times reported as bookable, in response order.
    pub fn available_times(&self) -> Vec<NaiveTime> {
        self.available_slots
            .iter()
            .filter(|slot| slot.available)
            .map(|slot| slot.time)
            .collect()
    }
}

/// Everything needed to create a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub party_size: u32,
    pub special_requests: String,
    pub customer: CustomerDetails,
}

/// Confirmation returned by a successful booking call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub booking_reference: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A booking record as returned by the lookup and update endpoints. Only
/// the fields the engine reads are typed; the rest ride along in `extra`
/// so the raw payload can be echoed back to the UI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    #[serde(default)]
    pub booking_reference: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_mobile: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A partial booking update. Only the present fields are sent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BookingUpdate {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub party_size: Option<u32>,
}

impl BookingUpdate {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.time.is_none() && self.party_size.is_none()
    }
}

/// Operations the dialogue engine performs against the reservation service.
///
/// Implementations map transport and protocol failures into
/// [`DialogError::Api`] / [`DialogError::Network`]; they never panic.
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// `POST /AvailabilitySearch` for a date and party size.
    async fn search_availability(
        &self,
        date: NaiveDate,
        party_size: u32,
    ) -> Result<AvailabilityResponse, DialogError>;

    /// `POST /BookingWithStripeToken` creating a booking.
    async fn create_booking(
        &self,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, DialogError>;

    /// `GET /Booking/{reference}`.
    async fn get_booking(&self, reference: &str) -> Result<BookingRecord, DialogError>;

    /// `PATCH /Booking/{reference}` with the present fields only.
    async fn update_booking(
        &self,
        reference: &str,
        update: &BookingUpdate,
    ) -> Result<BookingRecord, DialogError>;

    /// `POST /Booking/{reference}/Cancel`.
    async fn cancel_booking(
        &self,
        reference: &str,
        reason_id: u8,
    ) -> Result<serde_json::Value, DialogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_times_filters_full_slots() {
        let resp: AvailabilityResponse = serde_json::from_str(
            r#"{"available_slots":[
                {"time":"12:00:00","available":true},
                {"time":"12:30:00","available":false},
                {"time":"13:00:00","available":true}
            ]}"#,
        )
        .unwrap();
        let times = resp.available_times();
        assert_eq!(times.len(), 2);
        assert_eq!(times[0], NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        assert_eq!(times[1], NaiveTime::from_hms_opt(13, 0, 0).unwrap());
    }

    #[test]
    fn test_availability_response_tolerates_missing_slots_field() {
        let resp: AvailabilityResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(resp.available_slots.is_empty());
        assert!(resp.available_times().is_empty());
    }

    #[test]
    fn test_availability_response_keeps_unknown_fields() {
        let resp: AvailabilityResponse = serde_json::from_str(
            r#"{"available_slots":[],"restaurant":"TheHungryUnicorn"}"#,
        )
        .unwrap();
        assert_eq!(
            resp.extra.get("restaurant").and_then(|v| v.as_str()),
            Some("TheHungryUnicorn")
        );
    }

    #[test]
    fn test_booking_record_reads_contact_fields() {
        let record: BookingRecord = serde_json::from_str(
            r#"{"booking_reference":"ABC123",
                "customer_email":"ada@example.com",
                "customer_mobile":"07123456789",
                "status":"confirmed"}"#,
        )
        .unwrap();
        assert_eq!(record.booking_reference.as_deref(), Some("ABC123"));
        assert_eq!(record.customer_email.as_deref(), Some("ada@example.com"));
        assert_eq!(record.extra.get("status").and_then(|v| v.as_str()), Some("confirmed"));
    }

    #[test]
    fn test_booking_update_emptiness() {
        assert!(BookingUpdate::default().is_empty());
        let update = BookingUpdate {
            party_size: Some(5),
            ..BookingUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
