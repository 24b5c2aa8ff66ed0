//! Asset availability.
//!
//! An asset is unavailable on a day if its registry record says it is
//! not operational, or if any other active job that lists it occupies
//! that day.

use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;

use super::{bounded, Availability};
use crate::config::DispatchConfig;
use crate::error::DispatchError;
use crate::models::DateWindow;
use crate::store::{AssetSource, JobFilter, JobSource};

/// Decides whether an asset is already committed.
pub struct ResourceAvailabilityChecker<S: ?Sized> {
    store: Arc<S>,
    filter: JobFilter,
    timeout: Duration,
    require_registered: bool,
}

impl<S: ?Sized> Clone for ResourceAvailabilityChecker<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            filter: self.filter.clone(),
            timeout: self.timeout,
            require_registered: self.require_registered,
        }
    }
}

impl<S> ResourceAvailabilityChecker<S>
where
    S: JobSource + AssetSource + ?Sized,
{
    /// Creates a checker over `store`.
    pub fn new(store: Arc<S>, config: &DispatchConfig) -> Self {
        Self {
            store,
            filter: JobFilter::with_statuses(config.active_statuses.clone()),
            timeout: config.lookup_timeout(),
            require_registered: config.require_registered_assets,
        }
    }

    /// Checks one asset on one day.
    ///
    /// `exclude_job` is the job being moved; its own commitment never
    /// conflicts with itself.
    pub async fn check_asset_availability(
        &self,
        asset_id: &str,
        date: NaiveDate,
        exclude_job: Option<&str>,
    ) -> Result<Availability, DispatchError> {
        self.check_window(asset_id, DateWindow::single(date), exclude_job)
            .await
    }

    /// Checks one asset across every day of `window`.
    ///
    /// Reports the first conflicting job in listing order.
    pub async fn check_window(
        &self,
        asset_id: &str,
        window: DateWindow,
        exclude_job: Option<&str>,
    ) -> Result<Availability, DispatchError> {
        if asset_id.trim().is_empty() {
            return Err(DispatchError::InvalidRequest(
                "asset ID must not be empty".into(),
            ));
        }

        let record = bounded(
            self.timeout,
            || format!("asset {asset_id}"),
            self.store.get_asset(asset_id),
        )
        .await?;

        match record {
            Some(asset) if !asset.is_operational() => {
                return Ok(Availability::unavailable(format!("Asset is {}", asset.status)));
            }
            None if self.require_registered => {
                return Ok(Availability::unavailable("Asset not found"));
            }
            _ => {}
        }

        let jobs = bounded(
            self.timeout,
            || "job list".to_string(),
            self.store.list_jobs(&self.filter),
        )
        .await?;

        let clash = jobs
            .iter()
            .filter(|job| Some(job.id.as_str()) != exclude_job)
            .filter(|job| job.assigned_assets.contains(asset_id))
            .find_map(|job| {
                job.window()
                    .and_then(|w| w.first_shared_day(&window))
                    .map(|day| (job, day))
            });

        Ok(match clash {
            Some((job, day)) => {
                tracing::debug!(asset_id, job_id = %job.id, %day, "asset already committed");
                Availability::unavailable(format!(
                    "Already assigned to {} on {}",
                    job.display_name(),
                    day
                ))
            }
            None => Availability::available(),
        })
    }
}
