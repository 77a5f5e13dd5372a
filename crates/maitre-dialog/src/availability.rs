//! Availability policy: input guards and the alternative-time search.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::Serialize;
use tracing::debug;

use crate::api::BookingApi;
use crate::error::DialogError;

/// Inclusive party-size bounds accepted by the booking flow.
pub const MIN_PARTY_SIZE: u32 = 1;
pub const MAX_PARTY_SIZE: u32 = 20;

/// Valid cancellation reason identifiers.
pub const CANCELLATION_REASON_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// How many alternative times to offer from the requested day.
pub const SAME_DAY_ALTERNATIVES: usize = 4;
/// How many alternative times to offer from each adjacent day.
pub const ADJACENT_DAY_ALTERNATIVES: usize = 3;

/// Reject party sizes outside the accepted range before any API call.
pub fn validate_party_size(size: u32) -> Result<(), DialogError> {
    if (MIN_PARTY_SIZE..=MAX_PARTY_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(DialogError::Validation(format!(
            "Party size must be between {MIN_PARTY_SIZE} and {MAX_PARTY_SIZE} people."
        )))
    }
}

/// Reject dates strictly before today in the reference timezone.
pub fn validate_not_past(date: NaiveDate, today: NaiveDate) -> Result<(), DialogError> {
    if date < today {
        Err(DialogError::Validation(
            "That date has already passed. Which upcoming date would you like?".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Reject cancellation reasons outside the service's accepted set.
pub fn validate_cancellation_reason(reason_id: u8) -> Result<(), DialogError> {
    if CANCELLATION_REASON_RANGE.contains(&reason_id) {
        Ok(())
    } else {
        Err(DialogError::Validation(format!(
            "Cancellation reason must be between {} and {}.",
            CANCELLATION_REASON_RANGE.start(),
            CANCELLATION_REASON_RANGE.end()
        )))
    }
}

/// Alternative times offered when the requested time is unavailable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Alternatives {
    pub requested_day: Vec<NaiveTime>,
    pub previous_day: DayAlternatives,
    pub next_day: DayAlternatives,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DayAlternatives {
    pub date: Option<NaiveDate>,
    pub times: Vec<NaiveTime>,
}

impl Alternatives {
    pub fn is_empty(&self) -> bool {
        self.requested_day.is_empty()
            && self.previous_day.times.is_empty()
            && self.next_day.times.is_empty()
    }
}

/// Gather substitute times around an unavailable choice: up to
/// [`SAME_DAY_ALTERNATIVES`] from the requested day plus up to
/// [`ADJACENT_DAY_ALTERNATIVES`] from each adjacent calendar day.
///
/// The adjacent-day lookups are distinct calls, not retries; one failing
/// only shrinks the offer.
pub async fn collect_alternatives<A: BookingApi>(
    api: &A,
    date: NaiveDate,
    party_size: u32,
    requested_day_times: &[NaiveTime],
) -> Alternatives {
    let mut alternatives = Alternatives {
        requested_day: requested_day_times
            .iter()
            .copied()
            .take(SAME_DAY_ALTERNATIVES)
            .collect(),
        ..Alternatives::default()
    };

    let previous = date - Duration::days(1);
    let next = date + Duration::days(1);

    alternatives.previous_day = adjacent_day(api, previous, party_size).await;
    alternatives.next_day = adjacent_day(api, next, party_size).await;
    alternatives
}

async fn adjacent_day<A: BookingApi>(
    api: &A,
    date: NaiveDate,
    party_size: u32,
) -> DayAlternatives {
    match api.search_availability(date, party_size).await {
        Ok(response) => DayAlternatives {
            date: Some(date),
            times: response
                .available_times()
                .into_iter()
                .take(ADJACENT_DAY_ALTERNATIVES)
                .collect(),
        },
        Err(err) => {
            debug!(%date, "adjacent-day availability lookup failed: {err}");
            DayAlternatives {
                date: Some(date),
                times: Vec::new(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{
        AvailabilityResponse, BookingConfirmation, BookingRecord, BookingRequest, BookingUpdate,
    };
    use async_trait::async_trait;
    use maitre_core::AvailabilitySlot;
    use std::sync::Mutex;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, day).unwrap()
    }

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    // ---- Guards ----

    #[test]
    fn test_party_size_bounds() {
        assert!(validate_party_size(1).is_ok());
        assert!(validate_party_size(20).is_ok());
        assert!(validate_party_size(0).is_err());
        assert!(validate_party_size(21).is_err());
    }

    #[test]
    fn test_past_date_rejected() {
        assert!(validate_not_past(d(5), d(6)).is_err());
        assert!(validate_not_past(d(6), d(6)).is_ok());
        assert!(validate_not_past(d(7), d(6)).is_ok());
    }

    #[test]
    fn test_cancellation_reason_bounds() {
        assert!(validate_cancellation_reason(1).is_ok());
        assert!(validate_cancellation_reason(5).is_ok());
        assert!(validate_cancellation_reason(0).is_err());
        assert!(validate_cancellation_reason(6).is_err());
    }

    // ---- Alternatives ----

    /// Availability stub answering per-date, failing where scripted.
    struct StubApi {
        times_by_day: Vec<(NaiveDate, Vec<NaiveTime>)>,
        failing_days: Vec<NaiveDate>,
        calls: Mutex<Vec<NaiveDate>>,
    }

    #[async_trait]
    impl BookingApi for StubApi {
        async fn search_availability(
            &self,
            date: NaiveDate,
            _party_size: u32,
        ) -> Result<AvailabilityResponse, DialogError> {
            self.calls.lock().unwrap().push(date);
            if self.failing_days.contains(&date) {
                return Err(DialogError::Network("boom".into()));
            }
            let times = self
                .times_by_day
                .iter()
                .find(|(d, _)| *d == date)
                .map(|(_, times)| times.clone())
                .unwrap_or_default();
            Ok(AvailabilityResponse {
                available_slots: times
                    .into_iter()
                    .map(|time| AvailabilitySlot {
                        time,
                        available: true,
                    })
                    .collect(),
                extra: Default::default(),
            })
        }

        async fn create_booking(
            &self,
            _request: &BookingRequest,
        ) -> Result<BookingConfirmation, DialogError> {
            unreachable!("not used in these tests")
        }

        async fn get_booking(&self, _reference: &str) -> Result<BookingRecord, DialogError> {
            unreachable!("not used in these tests")
        }

        async fn update_booking(
            &self,
            _reference: &str,
            _update: &BookingUpdate,
        ) -> Result<BookingRecord, DialogError> {
            unreachable!("not used in these tests")
        }

        async fn cancel_booking(
            &self,
            _reference: &str,
            _reason_id: u8,
        ) -> Result<serde_json::Value, DialogError> {
            unreachable!("not used in these tests")
        }
    }

    #[tokio::test]
    async fn test_alternatives_query_both_adjacent_days() {
        let api = StubApi {
            times_by_day: vec![
                (d(6), vec![t(12), t(13)]),
                (d(8), vec![t(18), t(19), t(20), t(21)]),
            ],
            failing_days: vec![],
            calls: Mutex::new(vec![]),
        };

        let alts = collect_alternatives(&api, d(7), 4, &[t(12), t(13), t(14), t(15), t(16)]).await;

        assert_eq!(api.calls.lock().unwrap().as_slice(), &[d(6), d(8)]);
        assert_eq!(alts.requested_day.len(), SAME_DAY_ALTERNATIVES);
        assert_eq!(alts.previous_day.date, Some(d(6)));
        assert_eq!(alts.previous_day.times, vec![t(12), t(13)]);
        assert_eq!(alts.next_day.times.len(), ADJACENT_DAY_ALTERNATIVES);
    }

    #[tokio::test]
    async fn test_failed_adjacent_lookup_degrades_to_empty() {
        let api = StubApi {
            times_by_day: vec![(d(8), vec![t(18)])],
            failing_days: vec![d(6)],
            calls: Mutex::new(vec![]),
        };

        let alts = collect_alternatives(&api, d(7), 2, &[t(12)]).await;

        assert_eq!(alts.requested_day, vec![t(12)]);
        assert!(alts.previous_day.times.is_empty());
        assert_eq!(alts.next_day.times, vec![t(18)]);
        assert!(!alts.is_empty());
    }

    #[tokio::test]
    async fn test_alternatives_empty_when_nothing_anywhere() {
        let api = StubApi {
            times_by_day: vec![],
            failing_days: vec![],
            calls: Mutex::new(vec![]),
        };
        let alts = collect_alternatives(&api, d(7), 2, &[]).await;
        assert!(alts.is_empty());
    }
}
