//! Rain advisory for proposed dates.
//!
//! Weather never blocks a move. When the forecast for the new start date
//! meets the rain rule, and the configured policy says the job cares, the
//! coordinator asks the user to confirm.
//!
//! # Modules
//!
//! - **`forecast`**: forecast data shape, `is_rainy`, condition classes
//! - **`client`**: `ForecastSource` provider trait and the caching `ForecastClient`

mod client;
mod forecast;

pub use client::{ForecastClient, ForecastSource, StaticForecastSource};
pub use forecast::{
    is_rainy, DailyForecast, DayForecast, ForecastData, WeatherCondition, RAIN_CODES,
    RAIN_PROBABILITY_THRESHOLD, RAIN_SUM_THRESHOLD_MM,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::DispatchConfig;
use crate::error::DispatchError;
use crate::models::{Conflict, GeoPoint, Job};

/// Which jobs get a rain prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherPolicy {
    /// Every job.
    #[default]
    AllJobs,
    /// Only jobs with paving or asphalt work lines.
    PavingSensitive,
    /// Never prompt.
    Disabled,
}

impl WeatherPolicy {
    /// Whether rain matters for `job` under this policy.
    pub fn applies_to(&self, job: &Job) -> bool {
        match self {
            WeatherPolicy::AllJobs => true,
            WeatherPolicy::PavingSensitive => job.is_paving_sensitive(),
            WeatherPolicy::Disabled => false,
        }
    }
}

/// Produces the soft weather conflict for a proposed date.
#[derive(Clone)]
pub struct WeatherAdvisory {
    client: ForecastClient,
    policy: WeatherPolicy,
    default_site: Option<GeoPoint>,
}

impl WeatherAdvisory {
    /// Creates an advisory using `client` and the weather section of `config`.
    pub fn new(client: ForecastClient, config: &DispatchConfig) -> Self {
        Self {
            client,
            policy: config.weather.policy,
            default_site: config.weather.default_site,
        }
    }

    /// The active policy.
    pub fn policy(&self) -> WeatherPolicy {
        self.policy
    }

    /// Returns a weather conflict if rain is expected at the job's site
    /// on `date` and the policy covers this job.
    ///
    /// Jobs with no site, when no default site is configured, get no
    /// advisory. No forecast is fetched when the policy excludes the job.
    pub async fn advise(
        &self,
        job: &Job,
        date: NaiveDate,
    ) -> Result<Option<Conflict>, DispatchError> {
        if !self.policy.applies_to(job) {
            return Ok(None);
        }
        let Some(site) = job.site.or(self.default_site) else {
            tracing::debug!(job_id = %job.id, "no site for weather check");
            return Ok(None);
        };

        let forecast = self.client.get_forecast(site).await?;
        Ok(is_rainy(date, &forecast).then(|| Conflict::weather(date)))
    }
}
