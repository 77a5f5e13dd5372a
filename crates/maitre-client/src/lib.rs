//! HTTP client for the restaurant reservation service.
//!
//! Thin transport behind [`BookingApi`]: this crate owns URLs, the bearer
//! header, and the form-encoded payload shapes. No dialogue logic lives
//! here; swap this crate out to talk to a different backend.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use maitre_core::config::BookingApiConfig;
use maitre_core::{MaitreError, Result};
use maitre_dialog::{
    AvailabilityResponse, BookingApi, BookingConfirmation, BookingRecord, BookingRequest,
    BookingUpdate, DialogError,
};

/// Fixed channel code sent with searches and bookings.
const CHANNEL_CODE: &str = "ONLINE";

/// How much of an error body to quote back to the user.
const ERROR_DETAIL_LIMIT: usize = 200;

/// reqwest-backed implementation of [`BookingApi`].
pub struct RestBookingApi {
    client: Client,
    base_url: String,
    restaurant: String,
    token: String,
}

impl RestBookingApi {
    /// Build a client from the API section of the configuration plus the
    /// bearer token (loaded from the environment by the host).
    pub fn new(config: &BookingApiConfig, token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MaitreError::Config(format!("HTTP client setup failed: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url(),
            restaurant: config.restaurant.clone(),
            token: token.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Send a prepared request and decode the JSON body, mapping transport
    /// and status failures into the dialogue error taxonomy.
    async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> std::result::Result<T, DialogError> {
        let response = builder
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| DialogError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, response.text().await.unwrap_or_default()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| DialogError::Network(format!("invalid response body: {e}")))
    }
}

#[async_trait]
impl BookingApi for RestBookingApi {
    async fn search_availability(
        &self,
        date: NaiveDate,
        party_size: u32,
    ) -> std::result::Result<AvailabilityResponse, DialogError> {
        debug!(%date, party_size, "searching availability");
        let form = availability_form(date, party_size);
        self.execute(
            self.client
                .post(self.url("AvailabilitySearch"))
                .form(&form),
        )
        .await
    }

    async fn create_booking(
        &self,
        request: &BookingRequest,
    ) -> std::result::Result<BookingConfirmation, DialogError> {
        debug!(date = %request.date, time = %request.time, "creating booking");
        let form = booking_form(request);
        self.execute(
            self.client
                .post(self.url("BookingWithStripeToken"))
                .form(&form),
        )
        .await
    }

    async fn get_booking(
        &self,
        reference: &str,
    ) -> std::result::Result<BookingRecord, DialogError> {
        debug!(reference, "fetching booking");
        self.execute(self.client.get(self.url(&format!("Booking/{reference}"))))
            .await
    }

    async fn update_booking(
        &self,
        reference: &str,
        update: &BookingUpdate,
    ) -> std::result::Result<BookingRecord, DialogError> {
        debug!(reference, "updating booking");
        let form = update_form(update);
        self.execute(
            self.client
                .patch(self.url(&format!("Booking/{reference}")))
                .form(&form),
        )
        .await
    }

    async fn cancel_booking(
        &self,
        reference: &str,
        reason_id: u8,
    ) -> std::result::Result<serde_json::Value, DialogError> {
        debug!(reference, reason_id, "cancelling booking");
        let form = cancel_form(&self.restaurant, reference, reason_id);
        self.execute(
            self.client
                .post(self.url(&format!("Booking/{reference}/Cancel")))
                .form(&form),
        )
        .await
    }
}

// =============================================================================
// Payload shapes
// =============================================================================

fn fmt_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn fmt_time(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

fn availability_form(date: NaiveDate, party_size: u32) -> Vec<(&'static str, String)> {
    vec![
        ("VisitDate", fmt_date(date)),
        ("PartySize", party_size.to_string()),
        ("ChannelCode", CHANNEL_CODE.to_string()),
    ]
}

fn booking_form(request: &BookingRequest) -> Vec<(&'static str, String)> {
    vec![
        ("VisitDate", fmt_date(request.date)),
        ("VisitTime", fmt_time(request.time)),
        ("PartySize", request.party_size.to_string()),
        ("ChannelCode", CHANNEL_CODE.to_string()),
        ("SpecialRequests", request.special_requests.clone()),
        ("Customer[FirstName]", request.customer.first_name.clone()),
        ("Customer[Surname]", request.customer.surname.clone()),
        ("Customer[Email]", request.customer.email.clone()),
        ("Customer[Mobile]", request.customer.mobile.clone()),
    ]
}

fn update_form(update: &BookingUpdate) -> Vec<(&'static str, String)> {
    let mut form = Vec::new();
    if let Some(date) = update.date {
        form.push(("VisitDate", fmt_date(date)));
    }
    if let Some(time) = update.time {
        form.push(("VisitTime", fmt_time(time)));
    }
    if let Some(party_size) = update.party_size {
        form.push(("PartySize", party_size.to_string()));
    }
    form
}

fn cancel_form(restaurant: &str, reference: &str, reason_id: u8) -> Vec<(&'static str, String)> {
    vec![
        ("micrositeName", restaurant.to_string()),
        ("bookingReference", reference.to_string()),
        ("cancellationReasonId", reason_id.to_string()),
    ]
}

fn status_error(status: StatusCode, body: String) -> DialogError {
    let mut detail: String = body.chars().take(ERROR_DETAIL_LIMIT).collect();
    if detail.is_empty() {
        detail = status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string();
    }
    DialogError::Api {
        status: status.as_u16(),
        detail,
    }
}
