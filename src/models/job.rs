//! Job model.
//!
//! A job is one scheduled unit of field work (a paving, prep or seal
//! contract). It is created by the estimate workflow and, once scheduling
//! begins, only ever changed through the reschedule coordinator.
//!
//! # Date Representation
//! Start dates are calendar dates with no time component. A job with no
//! start date is unscheduled.

use chrono::NaiveDate;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::{DateWindow, GeoPoint};

/// Crew label (e.g., "A", "B", "C").
///
/// Crews are a small open set configured by the host; the dispatch core
/// only compares labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrewId(pub String);

impl CrewId {
    /// Creates a crew label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CrewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CrewId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Job lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    /// Sold and approved, not yet on the calendar.
    Approved,
    /// Has a start date and crew.
    Scheduled,
    /// Work has started on site.
    InProgress,
    /// Finished; no longer occupies crews or assets.
    Completed,
}

/// A job to be dispatched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Unique job identifier.
    pub id: String,
    /// Human-readable name (usually the customer).
    pub name: String,
    /// Crew currently assigned. `None` = unassigned.
    pub assigned_crew: Option<CrewId>,
    /// Vehicles and equipment committed to this job, in assignment order.
    pub assigned_assets: IndexSet<String>,
    /// First day on site. `None` = unscheduled.
    pub tentative_start_date: Option<NaiveDate>,
    /// Days on site. `None` or 0 is read as 1.
    pub duration_days: Option<u32>,
    /// Job that must finish first. Informational only.
    pub depends_on: Option<String>,
    /// Lifecycle status.
    pub status: JobStatus,
    /// Itemized work lines (e.g., "Asphalt overlay"), used by weather policy.
    pub work_items: Vec<String>,
    /// Job site location, for weather lookups.
    pub site: Option<GeoPoint>,
    /// Optimistic-concurrency revision, bumped on every committed write.
    pub revision: u64,
    /// Domain-specific key-value metadata.
    pub attributes: HashMap<String, String>,
}

impl Job {
    /// Creates an unscheduled, approved job.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            assigned_crew: None,
            assigned_assets: IndexSet::new(),
            tentative_start_date: None,
            duration_days: None,
            depends_on: None,
            status: JobStatus::Approved,
            work_items: Vec::new(),
            site: None,
            revision: 0,
            attributes: HashMap::new(),
        }
    }

    /// Sets the job name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the assigned crew.
    pub fn with_crew(mut self, crew: impl Into<CrewId>) -> Self {
        self.assigned_crew = Some(crew.into());
        self
    }

    /// Adds an asset. Duplicates are ignored.
    pub fn with_asset(mut self, asset_id: impl Into<String>) -> Self {
        self.assigned_assets.insert(asset_id.into());
        self
    }

    /// Places the job on the calendar and marks it scheduled.
    pub fn scheduled_on(mut self, start: NaiveDate) -> Self {
        self.tentative_start_date = Some(start);
        self.status = JobStatus::Scheduled;
        self
    }

    /// Sets the duration in days.
    pub fn with_duration(mut self, days: u32) -> Self {
        self.duration_days = Some(days);
        self
    }

    /// Sets the prerequisite job.
    pub fn with_dependency(mut self, job_id: impl Into<String>) -> Self {
        self.depends_on = Some(job_id.into());
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = status;
        self
    }

    /// Adds an itemized work line.
    pub fn with_work_item(mut self, item: impl Into<String>) -> Self {
        self.work_items.push(item.into());
        self
    }

    /// Sets the site location.
    pub fn with_site(mut self, site: GeoPoint) -> Self {
        self.site = Some(site);
        self
    }

    /// Adds a domain-specific attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Effective duration: the stored value, or 1 when unset or zero.
    pub fn effective_duration(&self) -> u32 {
        self.duration_days.filter(|d| *d > 0).unwrap_or(1)
    }

    /// Whether the job has a start date.
    pub fn is_scheduled(&self) -> bool {
        self.tentative_start_date.is_some()
    }

    /// The days this job occupies, if scheduled.
    pub fn window(&self) -> Option<DateWindow> {
        self.tentative_start_date
            .map(|start| DateWindow::from_start(start, self.effective_duration()))
    }

    /// Name for messages, falling back to the ID.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Whether any work line mentions paving or asphalt.
    pub fn is_paving_sensitive(&self) -> bool {
        self.work_items.iter().any(|item| {
            let lower = item.to_lowercase();
            lower.contains("pave") || lower.contains("asphalt")
        })
    }
}
