//! Forecast fetching with a location-keyed TTL cache.
//!
//! Locations are keyed by coordinates rounded to two decimals, so jobs
//! a few hundred meters apart share one cached forecast. Failed fetches
//! are never cached.

use async_trait::async_trait;
use moka::future::Cache;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::ForecastData;
use crate::checks::bounded;
use crate::config::DispatchConfig;
use crate::error::{DispatchError, SourceError};
use crate::models::GeoPoint;

/// A weather provider.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Fetches the daily forecast for a location.
    async fn fetch_forecast(&self, site: GeoPoint) -> Result<ForecastData, SourceError>;
}

/// Cached access to a [`ForecastSource`].
#[derive(Clone)]
pub struct ForecastClient {
    source: Arc<dyn ForecastSource>,
    cache: Cache<(i64, i64), Arc<ForecastData>>,
    timeout: Duration,
}

impl ForecastClient {
    /// Creates a client with the cache settings from `config`.
    pub fn new(source: Arc<dyn ForecastSource>, config: &DispatchConfig) -> Self {
        Self {
            source,
            cache: Cache::builder()
                .max_capacity(config.weather.cache_capacity)
                .time_to_live(config.weather.cache_ttl())
                .build(),
            timeout: config.lookup_timeout(),
        }
    }

    /// Forecast for `site`, from cache when fresh.
    pub async fn get_forecast(&self, site: GeoPoint) -> Result<Arc<ForecastData>, DispatchError> {
        let key = site.rounded_key();
        if let Some(hit) = self.cache.get(&key).await {
            return Ok(hit);
        }

        let data = bounded(
            self.timeout,
            || format!("forecast at {:.2},{:.2}", site.lat, site.lng),
            self.source.fetch_forecast(site),
        )
        .await?;

        let data = Arc::new(data);
        self.cache.insert(key, Arc::clone(&data)).await;
        tracing::debug!(lat = site.lat, lng = site.lng, "forecast cached");
        Ok(data)
    }

    /// Drops every cached forecast.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

/// A provider serving fixed forecasts, keyed like the cache.
///
/// Useful for hosts that pre-load forecasts and for tests. Unknown
/// locations get an empty forecast.
#[derive(Debug, Default)]
pub struct StaticForecastSource {
    forecasts: HashMap<(i64, i64), ForecastData>,
    fetches: AtomicU64,
}

impl StaticForecastSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `data` for `site`.
    pub fn with_forecast(mut self, site: GeoPoint, data: ForecastData) -> Self {
        self.forecasts.insert(site.rounded_key(), data);
        self
    }

    /// Number of fetches served.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ForecastSource for StaticForecastSource {
    async fn fetch_forecast(&self, site: GeoPoint) -> Result<ForecastData, SourceError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .forecasts
            .get(&site.rounded_key())
            .cloned()
            .unwrap_or_default())
    }
}
