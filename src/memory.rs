//! In-process implementation of every data-access contract.
//!
//! `InMemoryStore` backs tests and embedded hosts that keep the whole
//! schedule in memory. Commits honor the revision check exactly as a
//! document-store backend would.

use async_trait::async_trait;
use chrono::NaiveDate;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{CommitError, SourceError};
use crate::models::{Asset, Job, Roster, StaffAvailabilityRecord};
use crate::store::{
    AssetSource, JobFilter, JobSource, RosterSource, ScheduleUpdate, ScheduleWriter,
    StaffAvailabilitySource,
};

/// A schedule held entirely in memory.
///
/// Jobs are listed in insertion order, which keeps conflict reports
/// deterministic.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    jobs: RwLock<IndexMap<String, Job>>,
    assets: RwLock<HashMap<String, Asset>>,
    rosters: RwLock<HashMap<NaiveDate, Roster>>,
    leave: RwLock<HashMap<(String, NaiveDate), StaffAvailabilityRecord>>,
    commits: AtomicU64,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a job.
    pub fn insert_job(&self, job: Job) {
        self.jobs.write().insert(job.id.clone(), job);
    }

    /// Inserts or replaces an asset record.
    pub fn insert_asset(&self, asset: Asset) {
        self.assets.write().insert(asset.id.clone(), asset);
    }

    /// Inserts or replaces the roster for its date.
    pub fn insert_roster(&self, roster: Roster) {
        self.rosters.write().insert(roster.date, roster);
    }

    /// Inserts or replaces a leave record.
    pub fn insert_staff_record(&self, record: StaffAvailabilityRecord) {
        self.leave
            .write()
            .insert((record.staff_id.clone(), record.date), record);
    }

    /// Builder: adds a job.
    pub fn with_job(self, job: Job) -> Self {
        self.insert_job(job);
        self
    }

    /// Builder: adds an asset.
    pub fn with_asset(self, asset: Asset) -> Self {
        self.insert_asset(asset);
        self
    }

    /// Builder: adds a roster.
    pub fn with_roster(self, roster: Roster) -> Self {
        self.insert_roster(roster);
        self
    }

    /// Builder: adds a leave record.
    pub fn with_staff_record(self, record: StaffAvailabilityRecord) -> Self {
        self.insert_staff_record(record);
        self
    }

    /// Snapshot of one job.
    pub fn job(&self, job_id: &str) -> Option<Job> {
        self.jobs.read().get(job_id).cloned()
    }

    /// Number of successful commits.
    pub fn commit_count(&self) -> u64 {
        self.commits.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl JobSource for InMemoryStore {
    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>, SourceError> {
        Ok(self
            .jobs
            .read()
            .values()
            .filter(|j| filter.matches(j))
            .cloned()
            .collect())
    }

    async fn get_job(&self, job_id: &str) -> Result<Option<Job>, SourceError> {
        Ok(self.job(job_id))
    }
}

#[async_trait]
impl AssetSource for InMemoryStore {
    async fn get_asset(&self, asset_id: &str) -> Result<Option<Asset>, SourceError> {
        Ok(self.assets.read().get(asset_id).cloned())
    }
}

#[async_trait]
impl RosterSource for InMemoryStore {
    async fn get_roster_for_date(&self, date: NaiveDate) -> Result<Option<Roster>, SourceError> {
        Ok(self.rosters.read().get(&date).cloned())
    }
}

#[async_trait]
impl StaffAvailabilitySource for InMemoryStore {
    async fn get_staff_availability(
        &self,
        staff_id: &str,
        date: NaiveDate,
    ) -> Result<Option<StaffAvailabilityRecord>, SourceError> {
        Ok(self
            .leave
            .read()
            .get(&(staff_id.to_string(), date))
            .cloned())
    }
}

#[async_trait]
impl ScheduleWriter for InMemoryStore {
    async fn commit_reschedule(
        &self,
        job_id: &str,
        expected_revision: u64,
        update: &ScheduleUpdate,
    ) -> Result<u64, CommitError> {
        let mut jobs = self.jobs.write();
        let job = jobs.get_mut(job_id).ok_or(CommitError::NotFound)?;
        if job.revision != expected_revision {
            return Err(CommitError::StaleRevision {
                expected: expected_revision,
                actual: job.revision,
            });
        }

        job.tentative_start_date = update.tentative_start_date;
        job.assigned_crew = update.assigned_crew.clone();
        job.duration_days = update.duration_days;
        job.status = update.status;
        job.revision += 1;

        self.commits.fetch_add(1, Ordering::Relaxed);
        Ok(job.revision)
    }
}
