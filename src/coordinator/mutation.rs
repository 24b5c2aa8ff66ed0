//! Reschedule coordinator.
//!
//! # Algorithm
//!
//! 1. Check every assigned asset across the new window. Any conflict blocks.
//! 2. Check every member of the new crew's roster on the new date. Any
//!    conflict blocks.
//! 3. Look for crew overlaps. If any, ask once with all of them listed.
//! 4. Consult the rain advisory. If rainy, ask again.
//! 5. Write date, crew, duration and `Scheduled` in one revision-checked commit.
//!
//! Checks within a phase run concurrently and are all awaited before the
//! phase decides, so every hard conflict in that phase is reported. A
//! failed lookup anywhere aborts the proposal with no write.

use chrono::NaiveDate;
use futures::future::join_all;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

use super::prompt::{ConfirmationPrompt, SoftConflictPrompt};
use super::state::{ProposalState, ProposalTrace};
use crate::checks::{
    bounded, DominoEffectAnalyzer, ResourceAvailabilityChecker, StaffAvailabilityChecker,
};
use crate::config::DispatchConfig;
use crate::error::DispatchError;
use crate::models::{Conflict, CrewId, DateWindow, Job, JobStatus};
use crate::store::{DispatchStore, ScheduleUpdate};
use crate::weather::{ForecastClient, WeatherAdvisory};

/// Which crew the job should end up on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrewChoice {
    /// Leave the job's current crew in place.
    Keep,
    /// Move the job to this crew.
    Assign(CrewId),
    /// Take the job off every crew.
    Unassigned,
}

/// A proposed move of one job.
#[derive(Debug, Clone)]
pub struct RescheduleRequest {
    /// Job to move.
    pub job_id: String,
    /// New start date.
    pub new_date: NaiveDate,
    /// Target crew.
    pub crew: CrewChoice,
    /// New duration. `None` keeps the job's own.
    pub new_duration_days: Option<u32>,
}

impl RescheduleRequest {
    /// Moves `job_id` to start on `new_date`, keeping crew and duration.
    pub fn new(job_id: impl Into<String>, new_date: NaiveDate) -> Self {
        Self {
            job_id: job_id.into(),
            new_date,
            crew: CrewChoice::Keep,
            new_duration_days: None,
        }
    }

    /// Assigns a crew.
    pub fn with_crew(mut self, crew: impl Into<CrewId>) -> Self {
        self.crew = CrewChoice::Assign(crew.into());
        self
    }

    /// Removes the crew assignment.
    pub fn unassigned(mut self) -> Self {
        self.crew = CrewChoice::Unassigned;
        self
    }

    /// Sets the duration.
    pub fn with_duration(mut self, days: u32) -> Self {
        self.new_duration_days = Some(days);
        self
    }
}

/// How a proposal ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RescheduleStatus {
    /// Written. Carries the job's new revision.
    Committed {
        /// Revision after the write.
        revision: u64,
    },
    /// A hard conflict stopped the move.
    Blocked,
    /// The user declined a soft conflict.
    Declined,
}

/// Result of [`ScheduleMutationCoordinator::propose_reschedule`].
#[derive(Debug, Clone)]
pub struct RescheduleOutcome {
    /// How the proposal ended.
    pub status: RescheduleStatus,
    /// Blocking conflicts (asset, staff).
    pub hard_conflicts: Vec<Conflict>,
    /// Conflicts the user was asked about (crew overlap, rain).
    pub soft_conflicts: Vec<Conflict>,
    /// States the proposal passed through.
    pub trace: ProposalTrace,
}

impl RescheduleOutcome {
    /// Whether the move was written.
    pub fn committed(&self) -> bool {
        matches!(self.status, RescheduleStatus::Committed { .. })
    }
}

/// Job IDs with a proposal running.
#[derive(Debug, Default)]
struct InFlight {
    jobs: Mutex<HashSet<String>>,
}

struct InFlightGuard<'a> {
    set: &'a InFlight,
    job_id: String,
}

impl InFlight {
    fn acquire(&self, job_id: &str) -> Result<InFlightGuard<'_>, DispatchError> {
        if !self.jobs.lock().insert(job_id.to_string()) {
            return Err(DispatchError::ProposalInFlight(job_id.to_string()));
        }
        Ok(InFlightGuard {
            set: self,
            job_id: job_id.to_string(),
        })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set.jobs.lock().remove(&self.job_id);
    }
}

/// Entry point for every drag, drop and edit that moves a job.
pub struct ScheduleMutationCoordinator<S: ?Sized> {
    store: Arc<S>,
    assets: ResourceAvailabilityChecker<S>,
    staff: StaffAvailabilityChecker<S>,
    domino: DominoEffectAnalyzer<S>,
    weather: WeatherAdvisory,
    config: DispatchConfig,
    in_flight: InFlight,
}

impl<S> ScheduleMutationCoordinator<S>
where
    S: DispatchStore + ?Sized,
{
    /// Creates a coordinator over the host's store and forecast client.
    pub fn new(store: Arc<S>, forecasts: ForecastClient, config: DispatchConfig) -> Self {
        Self {
            assets: ResourceAvailabilityChecker::new(Arc::clone(&store), &config),
            staff: StaffAvailabilityChecker::new(Arc::clone(&store), &config),
            domino: DominoEffectAnalyzer::new(Arc::clone(&store), &config),
            weather: WeatherAdvisory::new(forecasts, &config),
            store,
            config,
            in_flight: InFlight::default(),
        }
    }

    /// The asset checker, for standalone checks.
    pub fn assets(&self) -> &ResourceAvailabilityChecker<S> {
        &self.assets
    }

    /// The staff checker, for standalone checks.
    pub fn staff(&self) -> &StaffAvailabilityChecker<S> {
        &self.staff
    }

    /// The crew-overlap analyzer, for standalone checks.
    pub fn domino(&self) -> &DominoEffectAnalyzer<S> {
        &self.domino
    }

    /// The rain advisory, for standalone checks.
    pub fn weather(&self) -> &WeatherAdvisory {
        &self.weather
    }

    /// Validates and, if allowed, commits a move.
    ///
    /// Returns `Ok` with a `Blocked` or `Declined` status when conflicts
    /// stop the move; these are normal outcomes. Returns `Err` when the
    /// decision could not be made or the write failed. In every case
    /// other than `Committed`, nothing was written.
    #[tracing::instrument(
        skip_all,
        fields(job_id = %request.job_id, new_date = %request.new_date)
    )]
    pub async fn propose_reschedule(
        &self,
        request: RescheduleRequest,
        prompt: &dyn ConfirmationPrompt,
    ) -> Result<RescheduleOutcome, DispatchError> {
        let _guard = self.in_flight.acquire(&request.job_id)?;
        let mut trace = ProposalTrace::new();
        trace.advance(ProposalState::Validating)?;

        let job = self.load_job(&request.job_id).await?;
        let crew = match &request.crew {
            CrewChoice::Keep => job.assigned_crew.clone(),
            CrewChoice::Assign(c) => Some(c.clone()),
            CrewChoice::Unassigned => None,
        };
        let duration_days = request
            .new_duration_days
            .filter(|d| *d > 0)
            .or(job.duration_days);
        let duration = duration_days.filter(|d| *d > 0).unwrap_or(1);
        let window = DateWindow::from_start(request.new_date, duration);

        let hard = self.asset_conflicts(&job, window).await?;
        if !hard.is_empty() {
            return blocked(trace, hard);
        }

        if let Some(crew) = &crew {
            let hard = self.staff_conflicts(crew, request.new_date).await?;
            if !hard.is_empty() {
                return blocked(trace, hard);
            }
        }

        let mut soft = Vec::new();

        if let Some(crew) = &crew {
            let overlaps = self
                .domino
                .check_domino_effect(&job.id, request.new_date, duration, crew)
                .await?;
            if !overlaps.is_empty() {
                trace.advance(ProposalState::AwaitingConfirmation)?;
                soft.extend(overlaps.iter().cloned().map(Conflict::from));
                let question = SoftConflictPrompt::Domino {
                    job_id: job.id.clone(),
                    new_date: request.new_date,
                    crew: crew.clone(),
                    conflicts: overlaps,
                };
                if !prompt.confirm(&question).await {
                    return declined(trace, soft);
                }
            }
        }

        if let Some(advisory) = self.weather.advise(&job, request.new_date).await? {
            trace.advance(ProposalState::AwaitingConfirmation)?;
            soft.push(advisory);
            let question = SoftConflictPrompt::Weather {
                job_id: job.id.clone(),
                date: request.new_date,
            };
            if !prompt.confirm(&question).await {
                return declined(trace, soft);
            }
        }

        trace.advance(ProposalState::Committing)?;
        let update = ScheduleUpdate {
            tentative_start_date: Some(request.new_date),
            assigned_crew: crew,
            duration_days,
            status: JobStatus::Scheduled,
        };
        let revision = self.commit(&job, &update).await?;
        trace.advance(ProposalState::Idle)?;

        tracing::info!(revision, soft = soft.len(), "reschedule committed");
        Ok(RescheduleOutcome {
            status: RescheduleStatus::Committed { revision },
            hard_conflicts: Vec::new(),
            soft_conflicts: soft,
            trace,
        })
    }

    /// Takes a job off the calendar and returns it to `Approved`.
    ///
    /// Crew and duration are kept. Returns the new revision.
    #[tracing::instrument(skip(self))]
    pub async fn unschedule(&self, job_id: &str) -> Result<u64, DispatchError> {
        let _guard = self.in_flight.acquire(job_id)?;
        let job = self.load_job(job_id).await?;
        let update = ScheduleUpdate {
            tentative_start_date: None,
            assigned_crew: job.assigned_crew.clone(),
            duration_days: job.duration_days,
            status: JobStatus::Approved,
        };
        let revision = self.commit(&job, &update).await?;
        tracing::info!(revision, "job unscheduled");
        Ok(revision)
    }

    async fn load_job(&self, job_id: &str) -> Result<Job, DispatchError> {
        bounded(
            self.config.lookup_timeout(),
            || format!("job {job_id}"),
            self.store.get_job(job_id),
        )
        .await?
        .ok_or_else(|| DispatchError::JobNotFound(job_id.to_string()))
    }

    async fn asset_conflicts(
        &self,
        job: &Job,
        window: DateWindow,
    ) -> Result<Vec<Conflict>, DispatchError> {
        let checks = job
            .assigned_assets
            .iter()
            .map(|asset_id| self.assets.check_window(asset_id, window, Some(job.id.as_str())));
        let results = join_all(checks).await;

        let mut conflicts = Vec::new();
        for (asset_id, result) in job.assigned_assets.iter().zip(results) {
            let availability = result?;
            if !availability.available {
                conflicts.push(Conflict::asset(
                    asset_id.as_str(),
                    availability.reason.unwrap_or_default(),
                ));
            }
        }
        tracing::debug!(
            checked = job.assigned_assets.len(),
            conflicts = conflicts.len(),
            "asset phase done"
        );
        Ok(conflicts)
    }

    async fn staff_conflicts(
        &self,
        crew: &CrewId,
        date: NaiveDate,
    ) -> Result<Vec<Conflict>, DispatchError> {
        let Some(roster) = self.staff.roster_for(date).await? else {
            tracing::debug!(%crew, %date, "no roster saved; staff phase skipped");
            return Ok(Vec::new());
        };
        let members = roster.members(crew);

        let checks = members.iter().map(|staff_id| {
            self.staff
                .check_staff_availability(staff_id, date, crew, Some(&roster))
        });
        let results = join_all(checks).await;

        let mut conflicts = Vec::new();
        for (staff_id, result) in members.iter().zip(results) {
            let availability = result?;
            if !availability.available {
                conflicts.push(Conflict::staff(
                    staff_id.as_str(),
                    availability.reason.unwrap_or_default(),
                ));
            }
        }
        tracing::debug!(
            checked = members.len(),
            conflicts = conflicts.len(),
            "staff phase done"
        );
        Ok(conflicts)
    }

    async fn commit(&self, job: &Job, update: &ScheduleUpdate) -> Result<u64, DispatchError> {
        self.store
            .commit_reschedule(&job.id, job.revision, update)
            .await
            .map_err(|source| {
                tracing::warn!(job_id = %job.id, error = %source, "commit failed");
                DispatchError::WriteFailed {
                    job_id: job.id.clone(),
                    source,
                }
            })
    }
}

fn blocked(
    mut trace: ProposalTrace,
    hard: Vec<Conflict>,
) -> Result<RescheduleOutcome, DispatchError> {
    trace.advance(ProposalState::Blocked)?;
    trace.advance(ProposalState::Idle)?;
    tracing::info!(conflicts = hard.len(), "reschedule blocked");
    Ok(RescheduleOutcome {
        status: RescheduleStatus::Blocked,
        hard_conflicts: hard,
        soft_conflicts: Vec::new(),
        trace,
    })
}

fn declined(
    mut trace: ProposalTrace,
    soft: Vec<Conflict>,
) -> Result<RescheduleOutcome, DispatchError> {
    trace.advance(ProposalState::Idle)?;
    tracing::info!(conflicts = soft.len(), "reschedule declined by user");
    Ok(RescheduleOutcome {
        status: RescheduleStatus::Declined,
        hard_conflicts: Vec::new(),
        soft_conflicts: soft,
        trace,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::StaticConfirmation;
    use crate::error::CommitError;
    use crate::memory::InMemoryStore;
    use crate::models::{Asset, AssetStatus, GeoPoint, Roster, StaffAvailabilityRecord};
    use crate::testing::{init_tracing, FlakyStore};
    use crate::weather::{ForecastData, StaticForecastSource};
    use async_trait::async_trait;
    use std::sync::atomic::Ordering;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn site() -> GeoPoint {
        GeoPoint::new(43.65, -79.38)
    }

    fn coordinator<S: DispatchStore>(store: Arc<S>) -> ScheduleMutationCoordinator<S> {
        init_tracing();
        let config = DispatchConfig::default();
        let forecasts = ForecastClient::new(Arc::new(StaticForecastSource::new()), &config);
        ScheduleMutationCoordinator::new(store, forecasts, config)
    }

    fn rainy_coordinator(store: Arc<InMemoryStore>) -> ScheduleMutationCoordinator<InMemoryStore> {
        init_tracing();
        let data: ForecastData = serde_json::from_str(
            r#"{"daily": {
                "time": ["2024-07-01"],
                "weathercode": [2],
                "precipitation_sum": [0.0],
                "precipitation_probability_max": [80]
            }}"#,
        )
        .unwrap();
        let config = DispatchConfig::default();
        let source = Arc::new(StaticForecastSource::new().with_forecast(site(), data));
        ScheduleMutationCoordinator::new(store, ForecastClient::new(source, &config), config)
    }

    /// Answers every prompt the same way and records what was asked.
    struct Recording {
        answer: bool,
        asked: Mutex<Vec<SoftConflictPrompt>>,
    }

    impl Recording {
        fn new(answer: bool) -> Self {
            Self {
                answer,
                asked: Mutex::new(Vec::new()),
            }
        }

        fn count(&self) -> usize {
            self.asked.lock().len()
        }
    }

    #[async_trait]
    impl ConfirmationPrompt for Recording {
        async fn confirm(&self, prompt: &SoftConflictPrompt) -> bool {
            self.asked.lock().push(prompt.clone());
            self.answer
        }
    }

    /// Accepts, but edits the job behind the coordinator's back first.
    struct ConcurrentEdit {
        store: Arc<InMemoryStore>,
        job_id: &'static str,
    }

    #[async_trait]
    impl ConfirmationPrompt for ConcurrentEdit {
        async fn confirm(&self, _prompt: &SoftConflictPrompt) -> bool {
            if let Some(mut job) = self.store.job(self.job_id) {
                job.revision += 1;
                self.store.insert_job(job);
            }
            true
        }
    }

    fn crew_a_store() -> Arc<InMemoryStore> {
        Arc::new(
            InMemoryStore::new()
                .with_job(
                    Job::new("J3")
                        .with_name("Smith Driveway")
                        .with_crew("A")
                        .with_duration(3),
                )
                .with_job(
                    Job::new("J4")
                        .with_name("Lot 4")
                        .with_crew("A")
                        .scheduled_on(d(2024, 6, 11)),
                ),
        )
    }

    #[tokio::test]
    async fn test_asset_double_booking_blocks() {
        let store = Arc::new(
            InMemoryStore::new()
                .with_job(Job::new("J1").with_asset("T-101").scheduled_on(d(2024, 6, 10)))
                .with_job(Job::new("J2").with_asset("T-101")),
        );
        let c = coordinator(store.clone());
        let prompt = Recording::new(true);

        let out = c
            .propose_reschedule(RescheduleRequest::new("J2", d(2024, 6, 10)), &prompt)
            .await
            .unwrap();

        assert_eq!(out.status, RescheduleStatus::Blocked);
        assert_eq!(
            out.hard_conflicts,
            vec![Conflict::asset("T-101", "Already assigned to J1 on 2024-06-10")]
        );
        assert_eq!(prompt.count(), 0);
        assert_eq!(store.commit_count(), 0);
        assert_eq!(
            out.trace.states(),
            &[
                ProposalState::Idle,
                ProposalState::Validating,
                ProposalState::Blocked,
                ProposalState::Idle
            ]
        );
    }

    #[tokio::test]
    async fn test_every_blocking_asset_reported() {
        let store = Arc::new(
            InMemoryStore::new()
                .with_asset(Asset::new("P-7", "Paver").with_status(AssetStatus::DownForRepair))
                .with_job(Job::new("J1").with_asset("T-101").scheduled_on(d(2024, 6, 10)))
                .with_job(Job::new("J2").with_asset("T-101").with_asset("P-7")),
        );
        let c = coordinator(store);

        let out = c
            .propose_reschedule(
                RescheduleRequest::new("J2", d(2024, 6, 10)),
                &StaticConfirmation::ACCEPT,
            )
            .await
            .unwrap();

        let ids: Vec<_> = out
            .hard_conflicts
            .iter()
            .map(|c| match c {
                Conflict::Asset { asset_id, .. } => asset_id.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(ids, vec!["T-101", "P-7"]);
    }

    #[tokio::test]
    async fn test_clean_move_commits_once() {
        let store = Arc::new(InMemoryStore::new().with_job(Job::new("J1").with_asset("T-101")));
        let c = coordinator(store.clone());
        let prompt = Recording::new(false);

        let out = c
            .propose_reschedule(
                RescheduleRequest::new("J1", d(2024, 6, 15)).with_crew("B").with_duration(2),
                &prompt,
            )
            .await
            .unwrap();

        assert_eq!(out.status, RescheduleStatus::Committed { revision: 1 });
        assert!(out.committed());
        assert_eq!(prompt.count(), 0);
        assert_eq!(store.commit_count(), 1);

        let job = store.job("J1").unwrap();
        assert_eq!(job.tentative_start_date, Some(d(2024, 6, 15)));
        assert_eq!(job.assigned_crew, Some(CrewId::new("B")));
        assert_eq!(job.duration_days, Some(2));
        assert_eq!(job.status, JobStatus::Scheduled);
    }

    #[tokio::test]
    async fn test_zero_duration_keeps_stored_duration() {
        let store = Arc::new(InMemoryStore::new().with_job(Job::new("J1").with_duration(3)));
        let c = coordinator(store.clone());

        let out = c
            .propose_reschedule(
                RescheduleRequest::new("J1", d(2024, 6, 10)).with_duration(0),
                &StaticConfirmation::ACCEPT,
            )
            .await
            .unwrap();

        assert!(out.committed());
        let job = store.job("J1").unwrap();
        assert_eq!(job.duration_days, Some(3));
        assert!(crate::validation::validate_jobs(&[job]).is_ok());
    }

    #[tokio::test]
    async fn test_zero_duration_on_unsized_job_stays_unset() {
        let store = Arc::new(InMemoryStore::new().with_job(Job::new("J1")));
        let c = coordinator(store.clone());

        c.propose_reschedule(
            RescheduleRequest::new("J1", d(2024, 6, 10)).with_duration(0),
            &StaticConfirmation::ACCEPT,
        )
        .await
        .unwrap();

        assert_eq!(store.job("J1").unwrap().duration_days, None);
    }

    #[tokio::test]
    async fn test_domino_accepted_commits() {
        let store = crew_a_store();
        let c = coordinator(store.clone());
        let prompt = Recording::new(true);

        let out = c
            .propose_reschedule(RescheduleRequest::new("J3", d(2024, 6, 10)), &prompt)
            .await
            .unwrap();

        assert!(out.committed());
        assert_eq!(prompt.count(), 1);
        assert!(prompt.asked.lock()[0].message().contains("Lot 4 (2024-06-11)"));
        assert_eq!(out.soft_conflicts.len(), 1);
        assert!(out.trace.visited(ProposalState::AwaitingConfirmation));
        assert_eq!(store.job("J3").unwrap().tentative_start_date, Some(d(2024, 6, 10)));
    }

    #[tokio::test]
    async fn test_domino_declined_writes_nothing() {
        let store = crew_a_store();
        let c = coordinator(store.clone());

        let out = c
            .propose_reschedule(
                RescheduleRequest::new("J3", d(2024, 6, 10)),
                &StaticConfirmation::DECLINE,
            )
            .await
            .unwrap();

        assert_eq!(out.status, RescheduleStatus::Declined);
        assert_eq!(store.commit_count(), 0);
        let job = store.job("J3").unwrap();
        assert_eq!(job.tentative_start_date, None);
        assert_eq!(job.status, JobStatus::Approved);
    }

    #[tokio::test]
    async fn test_unassigned_move_skips_crew_checks() {
        let store = crew_a_store();
        let c = coordinator(store.clone());
        let prompt = Recording::new(false);

        let out = c
            .propose_reschedule(RescheduleRequest::new("J3", d(2024, 6, 10)).unassigned(), &prompt)
            .await
            .unwrap();

        assert!(out.committed());
        assert_eq!(prompt.count(), 0);
        assert_eq!(store.job("J3").unwrap().assigned_crew, None);
    }

    #[tokio::test]
    async fn test_staff_leave_blocks() {
        let store = Arc::new(
            InMemoryStore::new()
                .with_job(Job::new("J1").with_crew("A"))
                .with_roster(Roster::new(d(2024, 6, 10)).with_crew("A", ["u1", "u2"]))
                .with_staff_record(StaffAvailabilityRecord::unavailable(
                    "u1",
                    d(2024, 6, 10),
                    "Vacation",
                )),
        );
        let c = coordinator(store.clone());

        let out = c
            .propose_reschedule(
                RescheduleRequest::new("J1", d(2024, 6, 10)),
                &StaticConfirmation::ACCEPT,
            )
            .await
            .unwrap();

        assert_eq!(out.status, RescheduleStatus::Blocked);
        assert_eq!(out.hard_conflicts, vec![Conflict::staff("u1", "Vacation")]);
        assert_eq!(store.commit_count(), 0);
    }

    #[tokio::test]
    async fn test_weather_declined() {
        let store = Arc::new(InMemoryStore::new().with_job(Job::new("J1").with_site(site())));
        let c = rainy_coordinator(store.clone());
        let prompt = Recording::new(false);

        let out = c
            .propose_reschedule(RescheduleRequest::new("J1", d(2024, 7, 1)), &prompt)
            .await
            .unwrap();

        assert_eq!(out.status, RescheduleStatus::Declined);
        assert_eq!(out.soft_conflicts, vec![Conflict::weather(d(2024, 7, 1))]);
        assert!(matches!(prompt.asked.lock()[0], SoftConflictPrompt::Weather { .. }));
        assert_eq!(store.commit_count(), 0);
    }

    #[tokio::test]
    async fn test_domino_then_weather_asks_twice() {
        let store = Arc::new(
            InMemoryStore::new()
                .with_job(Job::new("J1").with_crew("A").with_site(site()))
                .with_job(Job::new("J2").with_crew("A").scheduled_on(d(2024, 7, 1))),
        );
        let c = rainy_coordinator(store.clone());
        let prompt = Recording::new(true);

        let out = c
            .propose_reschedule(RescheduleRequest::new("J1", d(2024, 7, 1)), &prompt)
            .await
            .unwrap();

        assert!(out.committed());
        assert_eq!(prompt.count(), 2);
        assert_eq!(out.soft_conflicts.len(), 2);
        let waits = out
            .trace
            .states()
            .iter()
            .filter(|s| **s == ProposalState::AwaitingConfirmation)
            .count();
        assert_eq!(waits, 2);
    }

    #[tokio::test]
    async fn test_blocked_move_skips_crew_overlap_scan() {
        let flaky = Arc::new(FlakyStore::new(
            InMemoryStore::new()
                .with_job(Job::new("J1").with_asset("T-101").scheduled_on(d(2024, 6, 10)))
                .with_job(Job::new("J2").with_asset("T-101").with_crew("A")),
        ));
        let c = coordinator(flaky.clone());

        let out = c
            .propose_reschedule(
                RescheduleRequest::new("J2", d(2024, 6, 10)),
                &StaticConfirmation::ACCEPT,
            )
            .await
            .unwrap();

        assert_eq!(out.status, RescheduleStatus::Blocked);
        // one listing for the single asset, none for the crew scan
        assert_eq!(flaky.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_job_list_failure_aborts() {
        let flaky = Arc::new(FlakyStore::new(
            InMemoryStore::new().with_job(Job::new("J1").with_asset("T-101")),
        ));
        flaky.fail_list_jobs();
        let c = coordinator(flaky.clone());

        let err = c
            .propose_reschedule(
                RescheduleRequest::new("J1", d(2024, 6, 10)),
                &StaticConfirmation::ACCEPT,
            )
            .await
            .unwrap_err();

        assert!(err.is_lookup_failure());
        assert_eq!(flaky.inner.commit_count(), 0);
    }

    #[tokio::test]
    async fn test_roster_failure_aborts() {
        let flaky = Arc::new(FlakyStore::new(
            InMemoryStore::new().with_job(Job::new("J1").with_crew("A")),
        ));
        flaky.fail_roster();
        let c = coordinator(flaky.clone());

        let err = c
            .propose_reschedule(
                RescheduleRequest::new("J1", d(2024, 6, 10)),
                &StaticConfirmation::ACCEPT,
            )
            .await
            .unwrap_err();

        assert!(err.is_lookup_failure());
        assert_eq!(flaky.inner.commit_count(), 0);
    }

    #[tokio::test]
    async fn test_commit_failure_reported() {
        let flaky = Arc::new(FlakyStore::new(InMemoryStore::new().with_job(Job::new("J1"))));
        flaky.fail_commit();
        let c = coordinator(flaky.clone());

        let err = c
            .propose_reschedule(
                RescheduleRequest::new("J1", d(2024, 6, 10)),
                &StaticConfirmation::ACCEPT,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::WriteFailed { ref job_id, .. } if job_id == "J1"));
        assert_eq!(flaky.inner.job("J1").unwrap().tentative_start_date, None);
    }

    #[tokio::test]
    async fn test_edit_during_prompt_is_stale() {
        let store = crew_a_store();
        let c = coordinator(store.clone());
        let prompt = ConcurrentEdit {
            store: store.clone(),
            job_id: "J3",
        };

        let err = c
            .propose_reschedule(RescheduleRequest::new("J3", d(2024, 6, 10)), &prompt)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::WriteFailed {
                source: CommitError::StaleRevision {
                    expected: 0,
                    actual: 1
                },
                ..
            }
        ));
        assert_eq!(store.job("J3").unwrap().tentative_start_date, None);
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let c = coordinator(Arc::new(InMemoryStore::new()));
        let err = c
            .propose_reschedule(
                RescheduleRequest::new("nope", d(2024, 6, 10)),
                &StaticConfirmation::ACCEPT,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::JobNotFound(ref id) if id == "nope"));
    }

    #[tokio::test]
    async fn test_unschedule_returns_job_to_approved() {
        let store = Arc::new(InMemoryStore::new().with_job(
            Job::new("J1")
                .with_crew("A")
                .scheduled_on(d(2024, 6, 10))
                .with_duration(2),
        ));
        let c = coordinator(store.clone());

        let revision = c.unschedule("J1").await.unwrap();
        assert_eq!(revision, 1);

        let job = store.job("J1").unwrap();
        assert_eq!(job.tentative_start_date, None);
        assert_eq!(job.status, JobStatus::Approved);
        assert_eq!(job.assigned_crew, Some(CrewId::new("A")));
        assert_eq!(job.duration_days, Some(2));
    }

    #[test]
    fn test_in_flight_guard() {
        let set = InFlight::default();
        let first = set.acquire("J1").unwrap();
        assert!(matches!(
            set.acquire("J1"),
            Err(DispatchError::ProposalInFlight(_))
        ));
        assert!(set.acquire("J2").is_ok());
        drop(first);
        assert!(set.acquire("J1").is_ok());
    }
}
