//! Conflict model.
//!
//! A conflict is one reason a proposed reschedule is unsafe. Conflicts
//! come in two severities:
//!
//! - **Hard** (asset or staff double-booking): the move is refused.
//! - **Soft** (crew overlap, rain risk): the move proceeds only if the
//!   user confirms.
//!
//! Conflicts are data, not errors. Lookup failures are reported
//! separately through [`crate::DispatchError`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Conflict severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Blocks the mutation unconditionally.
    Hard,
    /// Requires user confirmation to proceed.
    Soft,
}

/// A crew-overlap finding: another job on the same crew shares a day
/// with the moved job's new window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DominoConflict {
    /// The job already occupying the crew.
    pub conflicting_job_id: String,
    /// Its display name.
    pub conflicting_job_name: String,
    /// First shared day.
    pub date: NaiveDate,
}

impl fmt::Display for DominoConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.conflicting_job_name, self.date)
    }
}

/// A reason a reschedule cannot, or should not, proceed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Conflict {
    /// Asset is down or already committed elsewhere.
    Asset {
        /// The unavailable asset.
        asset_id: String,
        /// Human-readable reason.
        reason: String,
    },
    /// Staff member is on leave or already on another crew.
    Staff {
        /// The unavailable staff member.
        staff_id: String,
        /// Human-readable reason.
        reason: String,
    },
    /// Moving the job double-books its crew.
    Domino(DominoConflict),
    /// Rain is expected on the date.
    Weather {
        /// Rainy date.
        date: NaiveDate,
    },
}

impl Conflict {
    /// Creates an asset conflict.
    pub fn asset(asset_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Asset {
            asset_id: asset_id.into(),
            reason: reason.into(),
        }
    }

    /// Creates a staff conflict.
    pub fn staff(staff_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Staff {
            staff_id: staff_id.into(),
            reason: reason.into(),
        }
    }

    /// Creates a weather advisory.
    pub fn weather(date: NaiveDate) -> Self {
        Self::Weather { date }
    }

    /// Severity of this conflict.
    pub fn severity(&self) -> Severity {
        match self {
            Conflict::Asset { .. } | Conflict::Staff { .. } => Severity::Hard,
            Conflict::Domino(_) | Conflict::Weather { .. } => Severity::Soft,
        }
    }

    /// Whether this conflict blocks the mutation.
    #[inline]
    pub fn is_hard(&self) -> bool {
        self.severity() == Severity::Hard
    }
}

impl From<DominoConflict> for Conflict {
    fn from(value: DominoConflict) -> Self {
        Conflict::Domino(value)
    }
}
