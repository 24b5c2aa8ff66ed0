//! Site coordinates.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude (degrees north).
    pub lat: f64,
    /// Longitude (degrees east).
    pub lng: f64,
}

impl GeoPoint {
    /// Creates a point.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Coordinates rounded to two decimals (about 1 km), as integer
    /// hundredths. Points that round the same share forecasts.
    pub fn rounded_key(&self) -> (i64, i64) {
        (
            (self.lat * 100.0).round() as i64,
            (self.lng * 100.0).round() as i64,
        )
    }
}
