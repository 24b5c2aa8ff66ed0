//! Staff availability.
//!
//! A person is unavailable on a date if a leave record takes them off
//! the schedule, or if that day's roster already lists them on a
//! different crew. Leave is checked first.

use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;

use super::{bounded, Availability};
use crate::config::DispatchConfig;
use crate::error::DispatchError;
use crate::models::{CrewId, Roster};
use crate::store::{RosterSource, StaffAvailabilitySource};

/// Decides whether a crew member can work a given day.
pub struct StaffAvailabilityChecker<S: ?Sized> {
    store: Arc<S>,
    timeout: Duration,
}

impl<S: ?Sized> Clone for StaffAvailabilityChecker<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            timeout: self.timeout,
        }
    }
}

impl<S> StaffAvailabilityChecker<S>
where
    S: RosterSource + StaffAvailabilitySource + ?Sized,
{
    /// Creates a checker over `store`.
    pub fn new(store: Arc<S>, config: &DispatchConfig) -> Self {
        Self {
            store,
            timeout: config.lookup_timeout(),
        }
    }

    /// Fetches the roster for `date`.
    pub async fn roster_for(&self, date: NaiveDate) -> Result<Option<Roster>, DispatchError> {
        bounded(
            self.timeout,
            || format!("roster {date}"),
            self.store.get_roster_for_date(date),
        )
        .await
    }

    /// Checks one person on one day.
    ///
    /// `crew` is the crew the person would work on; `roster` is that
    /// day's roster, used to detect the person already working on
    /// another crew. Without a roster only leave is checked.
    pub async fn check_staff_availability(
        &self,
        staff_id: &str,
        date: NaiveDate,
        crew: &CrewId,
        roster: Option<&Roster>,
    ) -> Result<Availability, DispatchError> {
        let record = bounded(
            self.timeout,
            || format!("availability of {staff_id} on {date}"),
            self.store.get_staff_availability(staff_id, date),
        )
        .await?;

        if let Some(reason) = record.and_then(|r| r.unavailable_reason) {
            tracing::debug!(staff_id, %date, %reason, "staff on leave");
            return Ok(Availability::unavailable(reason));
        }

        if let Some(other) = roster.and_then(|r| r.other_crews_of(staff_id, crew).next()) {
            tracing::debug!(staff_id, %date, crew = %other, "staff double-booked");
            return Ok(Availability::unavailable(format!(
                "Already assigned to crew {other}"
            )));
        }

        Ok(Availability::available())
    }
}
