//! Daily rosters and staff availability.
//!
//! A roster assigns staff to named crews for one date. Leave records
//! mark individual staff unavailable on a date. Both are owned by the
//! crew-management workflow; the dispatch core only reads them.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::CrewId;

/// Staff assignment to crews for a single date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    /// Date this roster applies to.
    pub date: NaiveDate,
    /// Crew → staff IDs, each list in assignment order.
    pub crews: IndexMap<CrewId, Vec<String>>,
}

impl Roster {
    /// Creates an empty roster.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            crews: IndexMap::new(),
        }
    }

    /// Sets the members of a crew, replacing any previous list.
    pub fn with_crew<I, S>(mut self, crew: impl Into<CrewId>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.crews
            .insert(crew.into(), members.into_iter().map(Into::into).collect());
        self
    }

    /// Members of a crew (empty if the crew is not on this roster).
    pub fn members(&self, crew: &CrewId) -> &[String] {
        self.crews.get(crew).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Crews other than `except` that list this staff member.
    pub fn other_crews_of<'a>(
        &'a self,
        staff_id: &'a str,
        except: &'a CrewId,
    ) -> impl Iterator<Item = &'a CrewId> + 'a {
        self.crews
            .iter()
            .filter(move |(crew, members)| {
                *crew != except && members.iter().any(|m| m == staff_id)
            })
            .map(|(crew, _)| crew)
    }
}

/// Leave or unavailability for one staff member on one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffAvailabilityRecord {
    /// Staff member.
    pub staff_id: String,
    /// Date the record covers.
    pub date: NaiveDate,
    /// Why the person is out. `None` = record exists but person is available.
    pub unavailable_reason: Option<String>,
}

impl StaffAvailabilityRecord {
    /// A record marking the person out for `reason`.
    pub fn unavailable(
        staff_id: impl Into<String>,
        date: NaiveDate,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            staff_id: staff_id.into(),
            date,
            unavailable_reason: Some(reason.into()),
        }
    }

    /// A record explicitly marking the person available.
    pub fn available(staff_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            staff_id: staff_id.into(),
            date,
            unavailable_reason: None,
        }
    }

    /// Whether this record takes the person off the schedule.
    pub fn is_unavailable(&self) -> bool {
        self.unavailable_reason.is_some()
    }
}
