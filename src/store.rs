//! Data-access contracts.
//!
//! The dispatch core owns no storage. The host application provides
//! these lookups (and the single commit write) over whatever document
//! store it uses. All reads are side-effect free and may be issued
//! concurrently.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::{CommitError, SourceError};
use crate::models::{Asset, CrewId, Job, JobStatus, Roster, StaffAvailabilityRecord};

/// Status filter for job listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    /// Statuses to include. Empty = all jobs.
    pub statuses: Vec<JobStatus>,
}

impl JobFilter {
    /// A filter matching every job.
    pub fn all() -> Self {
        Self::default()
    }

    /// A filter matching the given statuses.
    pub fn with_statuses(statuses: impl Into<Vec<JobStatus>>) -> Self {
        Self {
            statuses: statuses.into(),
        }
    }

    /// Whether a job passes this filter.
    pub fn matches(&self, job: &Job) -> bool {
        self.statuses.is_empty() || self.statuses.contains(&job.status)
    }
}

/// The fields a successful reschedule writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleUpdate {
    /// New start date. `None` unschedules the job.
    pub tentative_start_date: Option<NaiveDate>,
    /// New crew.
    pub assigned_crew: Option<CrewId>,
    /// New duration.
    pub duration_days: Option<u32>,
    /// New status.
    pub status: JobStatus,
}

/// Read access to jobs.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Lists jobs matching `filter`.
    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>, SourceError>;

    /// Fetches one job.
    async fn get_job(&self, job_id: &str) -> Result<Option<Job>, SourceError>;
}

/// Read access to the asset registry.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Fetches one asset record.
    async fn get_asset(&self, asset_id: &str) -> Result<Option<Asset>, SourceError>;
}

/// Read access to daily rosters.
#[async_trait]
pub trait RosterSource: Send + Sync {
    /// The crew sheet for `date`, if one was saved.
    async fn get_roster_for_date(&self, date: NaiveDate) -> Result<Option<Roster>, SourceError>;
}

/// Read access to leave records.
#[async_trait]
pub trait StaffAvailabilitySource: Send + Sync {
    /// The leave record for a staff member on a date, if any.
    async fn get_staff_availability(
        &self,
        staff_id: &str,
        date: NaiveDate,
    ) -> Result<Option<StaffAvailabilityRecord>, SourceError>;
}

/// The single write the coordinator performs.
#[async_trait]
pub trait ScheduleWriter: Send + Sync {
    /// Applies `update` iff the stored revision equals `expected_revision`.
    ///
    /// Returns the new revision. Either every field is written or none is.
    async fn commit_reschedule(
        &self,
        job_id: &str,
        expected_revision: u64,
        update: &ScheduleUpdate,
    ) -> Result<u64, CommitError>;
}

/// Everything the coordinator needs from the host, in one bound.
pub trait DispatchStore:
    JobSource + AssetSource + RosterSource + StaffAvailabilitySource + ScheduleWriter
{
}

impl<T> DispatchStore for T where
    T: JobSource + AssetSource + RosterSource + StaffAvailabilitySource + ScheduleWriter + ?Sized
{
}
