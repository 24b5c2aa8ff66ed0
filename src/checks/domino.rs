//! Crew-overlap ("domino") analysis.
//!
//! # Algorithm
//!
//! 1. Compute the moved job's new window `[new_date, new_date + duration - 1]`.
//! 2. For every other active job on the same crew with a start date,
//!    compute its window.
//! 3. Report each job whose window shares a day with the new one,
//!    naming the first shared day.
//!
//! # Complexity
//! O(n) in the number of active jobs.

use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;

use super::bounded;
use crate::config::DispatchConfig;
use crate::error::DispatchError;
use crate::models::{CrewId, DateWindow, DominoConflict, Job};
use crate::store::{JobFilter, JobSource};

/// Finds the jobs a move would double-book on its crew.
pub struct DominoEffectAnalyzer<S: ?Sized> {
    store: Arc<S>,
    filter: JobFilter,
    timeout: Duration,
}

impl<S: ?Sized> Clone for DominoEffectAnalyzer<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            filter: self.filter.clone(),
            timeout: self.timeout,
        }
    }
}

impl<S> DominoEffectAnalyzer<S>
where
    S: JobSource + ?Sized,
{
    /// Creates an analyzer over `store`.
    pub fn new(store: Arc<S>, config: &DispatchConfig) -> Self {
        Self {
            store,
            filter: JobFilter::with_statuses(config.active_statuses.clone()),
            timeout: config.lookup_timeout(),
        }
    }

    /// Lists the crew overlaps that moving `job_id` would cause.
    ///
    /// An empty result is the common case and means no warning.
    pub async fn check_domino_effect(
        &self,
        job_id: &str,
        new_date: NaiveDate,
        duration_days: u32,
        new_crew: &CrewId,
    ) -> Result<Vec<DominoConflict>, DispatchError> {
        let jobs = bounded(
            self.timeout,
            || "job list".to_string(),
            self.store.list_jobs(&self.filter),
        )
        .await?;

        let window = DateWindow::from_start(new_date, duration_days);
        let conflicts = overlaps_on_crew(&jobs, job_id, window, new_crew);
        if !conflicts.is_empty() {
            tracing::debug!(
                job_id,
                crew = %new_crew,
                count = conflicts.len(),
                "crew overlaps found"
            );
        }
        Ok(conflicts)
    }
}

/// Jobs on `crew`, other than `job_id`, whose windows share a day with `window`.
pub(crate) fn overlaps_on_crew(
    jobs: &[Job],
    job_id: &str,
    window: DateWindow,
    crew: &CrewId,
) -> Vec<DominoConflict> {
    jobs.iter()
        .filter(|job| job.id != job_id)
        .filter(|job| job.assigned_crew.as_ref() == Some(crew))
        .filter_map(|job| {
            let day = job.window()?.first_shared_day(&window)?;
            Some(DominoConflict {
                conflicting_job_id: job.id.clone(),
                conflicting_job_name: job.display_name().to_string(),
                date: day,
            })
        })
        .collect()
}
