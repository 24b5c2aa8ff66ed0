//! Failure injection for tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::{CommitError, SourceError};
use crate::memory::InMemoryStore;
use crate::models::{Asset, Job, Roster, StaffAvailabilityRecord};
use crate::store::{
    AssetSource, JobFilter, JobSource, RosterSource, ScheduleUpdate, ScheduleWriter,
    StaffAvailabilitySource,
};

/// Wraps an [`InMemoryStore`] and fails selected lookups on demand.
#[derive(Debug, Default)]
pub(crate) struct FlakyStore {
    pub(crate) inner: InMemoryStore,
    list_jobs_fails: AtomicBool,
    roster_fails: AtomicBool,
    staff_stalls: AtomicBool,
    commit_fails: AtomicBool,
    pub(crate) list_calls: AtomicUsize,
}

impl FlakyStore {
    pub(crate) fn new(inner: InMemoryStore) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }

    pub(crate) fn fail_list_jobs(&self) {
        self.list_jobs_fails.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_roster(&self) {
        self.roster_fails.store(true, Ordering::SeqCst);
    }

    pub(crate) fn stall_staff(&self) {
        self.staff_stalls.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_commit(&self) {
        self.commit_fails.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl JobSource for FlakyStore {
    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>, SourceError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.list_jobs_fails.load(Ordering::SeqCst) {
            return Err(SourceError::Unavailable("network offline".into()));
        }
        self.inner.list_jobs(filter).await
    }

    async fn get_job(&self, job_id: &str) -> Result<Option<Job>, SourceError> {
        self.inner.get_job(job_id).await
    }
}

#[async_trait]
impl AssetSource for FlakyStore {
    async fn get_asset(&self, asset_id: &str) -> Result<Option<Asset>, SourceError> {
        self.inner.get_asset(asset_id).await
    }
}

#[async_trait]
impl RosterSource for FlakyStore {
    async fn get_roster_for_date(&self, date: NaiveDate) -> Result<Option<Roster>, SourceError> {
        if self.roster_fails.load(Ordering::SeqCst) {
            return Err(SourceError::Malformed("roster document unreadable".into()));
        }
        self.inner.get_roster_for_date(date).await
    }
}

#[async_trait]
impl StaffAvailabilitySource for FlakyStore {
    async fn get_staff_availability(
        &self,
        staff_id: &str,
        date: NaiveDate,
    ) -> Result<Option<StaffAvailabilityRecord>, SourceError> {
        if self.staff_stalls.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(3_600)).await;
        }
        self.inner.get_staff_availability(staff_id, date).await
    }
}

#[async_trait]
impl ScheduleWriter for FlakyStore {
    async fn commit_reschedule(
        &self,
        job_id: &str,
        expected_revision: u64,
        update: &ScheduleUpdate,
    ) -> Result<u64, CommitError> {
        if self.commit_fails.load(Ordering::SeqCst) {
            return Err(CommitError::Backend("write rejected".into()));
        }
        self.inner
            .commit_reschedule(job_id, expected_revision, update)
            .await
    }
}

/// Routes `tracing` output to the test harness. Set `RUST_LOG` to see it.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
