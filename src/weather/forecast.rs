//! Daily forecast data and rain classification.
//!
//! The forecast shape follows the Open-Meteo daily API
//! (`daily=weathercode,precipitation_sum,precipitation_probability_max`),
//! so a host can deserialize the provider's JSON straight into
//! [`ForecastData`].
//!
//! # Rain Rule
//! A date is rainy iff ANY of:
//! - its WMO weather code is a drizzle, rain, shower or thunderstorm code
//! - its maximum precipitation probability exceeds 50%
//! - its summed precipitation exceeds 1.0 mm
//!
//! # Reference
//! WMO Code Table 4677 (present weather), as used by Open-Meteo.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// WMO codes treated as rain: drizzle/rain 51-67, showers 80-82,
/// thunderstorm 95-99.
pub const RAIN_CODES: [i32; 14] = [51, 53, 55, 61, 63, 65, 66, 67, 80, 81, 82, 95, 96, 99];

/// Probability (%) above which a day counts as rainy.
pub const RAIN_PROBABILITY_THRESHOLD: f64 = 50.0;

/// Precipitation (mm) above which a day counts as rainy.
pub const RAIN_SUM_THRESHOLD_MM: f64 = 1.0;

/// A multi-day forecast for one location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastData {
    /// Forecast latitude.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Forecast longitude.
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Per-day series. Absent when the provider returned no daily block.
    #[serde(default)]
    pub daily: Option<DailyForecast>,
}

/// Parallel per-day series, indexed by position in `time`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Forecast dates.
    pub time: Vec<NaiveDate>,
    /// WMO weather code per day.
    #[serde(default, rename = "weathercode", alias = "weather_code")]
    pub weather_code: Vec<Option<i32>>,
    /// Total precipitation per day (mm).
    #[serde(default)]
    pub precipitation_sum: Vec<Option<f64>>,
    /// Maximum precipitation probability per day (%).
    #[serde(default)]
    pub precipitation_probability_max: Vec<Option<f64>>,
}

/// One day's readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayForecast {
    /// Date.
    pub date: NaiveDate,
    /// WMO weather code.
    pub weather_code: Option<i32>,
    /// Total precipitation (mm).
    pub precipitation_sum: Option<f64>,
    /// Maximum precipitation probability (%).
    pub precipitation_probability_max: Option<f64>,
}

/// Coarse weather condition derived from a WMO code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherCondition {
    /// Code 0.
    Clear,
    /// Codes 1-3.
    Cloudy,
    /// Codes 45-48.
    Fog,
    /// Codes 51-67.
    Rain,
    /// Codes 71-77.
    Snow,
    /// Codes 80-82.
    Showers,
    /// Codes 95-99.
    Thunderstorm,
    /// Anything else.
    Unknown,
}

impl WeatherCondition {
    /// Classifies a WMO weather code.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => WeatherCondition::Clear,
            1..=3 => WeatherCondition::Cloudy,
            45..=48 => WeatherCondition::Fog,
            51..=67 => WeatherCondition::Rain,
            71..=77 => WeatherCondition::Snow,
            80..=82 => WeatherCondition::Showers,
            95..=99 => WeatherCondition::Thunderstorm,
            _ => WeatherCondition::Unknown,
        }
    }
}

impl DailyForecast {
    /// Readings for `date`, if it is within the forecast range.
    pub fn day(&self, date: NaiveDate) -> Option<DayForecast> {
        let i = self.time.iter().position(|t| *t == date)?;
        Some(DayForecast {
            date,
            weather_code: self.weather_code.get(i).copied().flatten(),
            precipitation_sum: self.precipitation_sum.get(i).copied().flatten(),
            precipitation_probability_max: self
                .precipitation_probability_max
                .get(i)
                .copied()
                .flatten(),
        })
    }
}

impl DayForecast {
    /// Whether this day meets the rain rule.
    pub fn is_rainy(&self) -> bool {
        let rainy_code = self
            .weather_code
            .is_some_and(|c| RAIN_CODES.contains(&c));
        let high_prob = self
            .precipitation_probability_max
            .is_some_and(|p| p > RAIN_PROBABILITY_THRESHOLD);
        let significant = self
            .precipitation_sum
            .is_some_and(|mm| mm > RAIN_SUM_THRESHOLD_MM);
        rainy_code || high_prob || significant
    }

    /// Coarse condition, if a code was reported.
    pub fn condition(&self) -> Option<WeatherCondition> {
        self.weather_code.map(WeatherCondition::from_code)
    }
}

impl ForecastData {
    /// Readings for `date`, if covered.
    pub fn day(&self, date: NaiveDate) -> Option<DayForecast> {
        self.daily.as_ref()?.day(date)
    }
}

/// Whether rain is expected on `date`.
///
/// Returns `false` when the forecast has no daily block or does not
/// cover the date.
pub fn is_rainy(date: NaiveDate, forecast: &ForecastData) -> bool {
    forecast.day(date).is_some_and(|day| day.is_rainy())
}
