//! Day-granular date windows.
//!
//! A job occupies every calendar day from its start date through
//! `start + duration - 1`. Conflict checking never looks below day
//! granularity: two windows collide iff they share at least one date.
//!
//! # Precedence
//! Windows are closed intervals. A one-day window has `start == end`.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// An inclusive date range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    /// First occupied day (inclusive).
    pub start: NaiveDate,
    /// Last occupied day (inclusive).
    pub end: NaiveDate,
}

impl DateWindow {
    /// Creates the window a job starting on `start` occupies for
    /// `duration_days` days.
    ///
    /// A duration of zero is treated as one day. Saturates at the
    /// maximum representable date.
    pub fn from_start(start: NaiveDate, duration_days: u32) -> Self {
        let extra = u64::from(duration_days.max(1) - 1);
        let end = start.checked_add_days(Days::new(extra)).unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    /// A window covering exactly one day.
    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// Number of days covered.
    #[inline]
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Whether `day` falls within this window.
    #[inline]
    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }

    /// Whether two windows share at least one day.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// First day both windows share, if any.
    pub fn first_shared_day(&self, other: &Self) -> Option<NaiveDate> {
        if self.overlaps(other) {
            Some(self.start.max(other.start))
        } else {
            None
        }
    }

    /// Iterates every day in the window, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}
