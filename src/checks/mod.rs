//! Availability and overlap checks.
//!
//! Three read-only checkers, each answering one question against the
//! host's data:
//!
//! - [`ResourceAvailabilityChecker`]: is this asset free on these days?
//! - [`StaffAvailabilityChecker`]: is this person free on this day?
//! - [`DominoEffectAnalyzer`]: which jobs on the crew would the move collide with?
//!
//! Every lookup is bounded by the configured timeout. A failed or late
//! lookup is an error, never an implicit "available".
//!
//! # Usage
//!
//! ```no_run
//! # async fn demo() -> Result<(), u_dispatch::DispatchError> {
//! use std::sync::Arc;
//! use chrono::NaiveDate;
//! use u_dispatch::checks::ResourceAvailabilityChecker;
//! use u_dispatch::memory::InMemoryStore;
//! use u_dispatch::DispatchConfig;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let checker = ResourceAvailabilityChecker::new(store, &DispatchConfig::default());
//! let day = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
//! let result = checker.check_asset_availability("T-101", day, None).await?;
//! assert!(result.available);
//! # Ok(())
//! # }
//! ```

mod asset;
mod domino;
mod staff;

pub use asset::ResourceAvailabilityChecker;
pub use domino::DominoEffectAnalyzer;
pub use staff::StaffAvailabilityChecker;

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::error::{DispatchError, SourceError};

/// Result of a single availability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    /// Whether the resource is free.
    pub available: bool,
    /// Why not, when unavailable.
    pub reason: Option<String>,
}

impl Availability {
    /// Free.
    pub fn available() -> Self {
        Self {
            available: true,
            reason: None,
        }
    }

    /// Taken, for `reason`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            available: false,
            reason: Some(reason.into()),
        }
    }
}

/// Runs a source lookup under `timeout`, mapping failure and lateness
/// to lookup errors.
pub(crate) async fn bounded<T, F, W>(
    timeout: Duration,
    what: W,
    lookup: F,
) -> Result<T, DispatchError>
where
    F: Future<Output = Result<T, SourceError>>,
    W: FnOnce() -> String,
{
    match tokio::time::timeout(timeout, lookup).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(source)) => {
            let what = what();
            tracing::warn!(%what, error = %source, "lookup failed");
            Err(DispatchError::lookup(what, source))
        }
        Err(_) => {
            let what = what();
            tracing::warn!(%what, ?timeout, "lookup timed out");
            Err(DispatchError::LookupTimedOut { what, timeout })
        }
    }
}
