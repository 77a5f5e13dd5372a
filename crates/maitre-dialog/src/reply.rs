//! The engine's reply model.
//!
//! Every turn produces exactly one [`Reply`]. The kind is a closed enum so
//! the orchestrator's branches are checked at compile time; the wire-level
//! action tag is derived from it, never compared as a string inside the
//! engine.

use serde::Serialize;

use crate::error::DialogError;

/// What happened this turn. One variant per action tag in the chat contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    AskDate,
    AskTime,
    AskParty,
    AskModification,
    AvailabilityFound,
    NoAvailability,
    TimeUnavailable,
    BookingCreated,
    BookingInfoShown,
    BookingModified,
    BookingCancelled,
    NoBooking,
    ValidationError,
    ApiError,
    NetworkError,
    Error,
    HelpShown,
    Reset,
    Default,
}

impl ReplyKind {
    /// Wire-level action tag for this kind.
    pub fn action(self) -> &'static str {
        match self {
            ReplyKind::AskDate => "ask_date",
            ReplyKind::AskTime => "ask_time",
            ReplyKind::AskParty => "ask_party",
            ReplyKind::AskModification => "ask_modification",
            ReplyKind::AvailabilityFound => "availability_found",
            ReplyKind::NoAvailability => "no_availability",
            ReplyKind::TimeUnavailable => "time_unavailable",
            ReplyKind::BookingCreated => "booking_created",
            ReplyKind::BookingInfoShown => "booking_info_shown",
            ReplyKind::BookingModified => "booking_modified",
            ReplyKind::BookingCancelled => "booking_cancelled",
            ReplyKind::NoBooking => "no_booking",
            ReplyKind::ValidationError => "validation_error",
            ReplyKind::ApiError => "api_error",
            ReplyKind::NetworkError => "network_error",
            ReplyKind::Error => "error",
            ReplyKind::HelpShown => "help_shown",
            ReplyKind::Reset => "reset",
            ReplyKind::Default => "default",
        }
    }
}

/// One turn's outcome: display text, a typed kind, and an optional payload
/// echoing the raw API response for UI affordances.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub kind: ReplyKind,
    pub text: String,
    pub data: Option<serde_json::Value>,
}

impl Reply {
    pub fn new(kind: ReplyKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            data: None,
        }
    }

    pub fn with_data(kind: ReplyKind, text: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            kind,
            text: text.into(),
            data: Some(data),
        }
    }

    /// Wire-level action tag.
    pub fn action(&self) -> &'static str {
        self.kind.action()
    }

    /// Convert a turn-level failure into the reply the user sees. Flow
    /// slots are untouched by construction; the caller decides what, if
    /// anything, to revert.
    pub fn from_error(err: DialogError) -> Self {
        match err {
            DialogError::Validation(msg) => Reply::new(ReplyKind::ValidationError, msg),
            DialogError::Api { status, detail } => Reply::new(
                ReplyKind::ApiError,
                format!("The booking service returned an error (status {status}): {detail}"),
            ),
            DialogError::Network(msg) => Reply::new(
                ReplyKind::NetworkError,
                format!("I couldn't reach the booking service: {msg}. Please try again."),
            ),
        }
    }
}
