//! Dispatch configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration.
//!
//! ```toml
//! lookup_timeout_ms = 5000
//! active_statuses = ["Approved", "Scheduled", "InProgress"]
//! require_registered_assets = false
//!
//! [weather]
//! policy = "paving_sensitive"
//! cache_ttl_secs = 3600
//! default_site = { lat = 43.65, lng = -79.38 }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::models::{GeoPoint, JobStatus};
use crate::weather::WeatherPolicy;

/// Configuration for the reschedule coordinator and its checkers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Bound on each individual lookup (ms). Exceeding it fails the proposal.
    pub lookup_timeout_ms: u64,
    /// Job statuses that occupy crews and assets.
    pub active_statuses: Vec<JobStatus>,
    /// Treat an asset with no registry record as unavailable.
    pub require_registered_assets: bool,
    /// Weather advisory settings.
    pub weather: WeatherConfig,
}

/// Weather advisory settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Which jobs get a rain prompt.
    pub policy: WeatherPolicy,
    /// Forecast cache lifetime (seconds).
    pub cache_ttl_secs: u64,
    /// Maximum number of cached forecast locations.
    pub cache_capacity: u64,
    /// Location used for jobs without a site.
    pub default_site: Option<GeoPoint>,
}

/// Errors loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            lookup_timeout_ms: 5_000,
            active_statuses: vec![
                JobStatus::Approved,
                JobStatus::Scheduled,
                JobStatus::InProgress,
            ],
            require_registered_assets: false,
            weather: WeatherConfig::default(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            policy: WeatherPolicy::AllJobs,
            cache_ttl_secs: 3_600,
            cache_capacity: 256,
            default_site: None,
        }
    }
}

impl DispatchConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Reads and parses a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Sets the lookup timeout.
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the weather policy.
    pub fn with_weather_policy(mut self, policy: WeatherPolicy) -> Self {
        self.weather.policy = policy;
        self
    }

    /// Sets the fallback forecast location.
    pub fn with_default_site(mut self, site: GeoPoint) -> Self {
        self.weather.default_site = Some(site);
        self
    }

    /// Requires every asset to have a registry record.
    pub fn with_registered_assets_required(mut self, required: bool) -> Self {
        self.require_registered_assets = required;
        self
    }

    /// Lookup timeout as a [`Duration`].
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}

impl WeatherConfig {
    /// Forecast cache lifetime as a [`Duration`].
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
