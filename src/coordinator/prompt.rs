//! Presentation adapter.
//!
//! The coordinator never talks to a screen. It hands soft conflicts to a
//! [`ConfirmationPrompt`] and returns hard conflicts as data; the
//! functions here turn both into the text a dispatcher sees.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::DispatchError;
use crate::models::{Conflict, CrewId, DominoConflict};

/// A soft conflict awaiting the user's decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoftConflictPrompt {
    /// The move double-books the crew.
    Domino {
        /// Job being moved.
        job_id: String,
        /// Proposed start date.
        new_date: NaiveDate,
        /// Crew being double-booked.
        crew: CrewId,
        /// Every overlap found, in listing order.
        conflicts: Vec<DominoConflict>,
    },
    /// Rain is expected on the start date.
    Weather {
        /// Job being moved.
        job_id: String,
        /// Rainy date.
        date: NaiveDate,
    },
}

impl SoftConflictPrompt {
    /// The combined question shown to the user.
    pub fn message(&self) -> String {
        match self {
            SoftConflictPrompt::Domino {
                new_date,
                crew,
                conflicts,
                ..
            } => {
                let lines: Vec<String> = conflicts.iter().map(|c| format!("- {c}")).collect();
                format!(
                    "DOMINO WARNING: Moving this job to {new_date} conflicts with:\n\n{}\n\n\
                     This will cause a double-booking for Crew {crew}. Proceed anyway?",
                    lines.join("\n")
                )
            }
            SoftConflictPrompt::Weather { date, .. } => format!(
                "WEATHER ALERT: Rain is expected on {date}.\n\n\
                 Do you want to proceed with scheduling?"
            ),
        }
    }
}

/// Asks the user to accept a soft conflict.
#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    /// `true` proceeds; `false` abandons the move with no write.
    async fn confirm(&self, prompt: &SoftConflictPrompt) -> bool;
}

/// Answers every prompt the same way. For non-interactive callers.
#[derive(Debug, Clone, Copy)]
pub struct StaticConfirmation(pub bool);

impl StaticConfirmation {
    /// Accepts everything.
    pub const ACCEPT: Self = Self(true);
    /// Declines everything.
    pub const DECLINE: Self = Self(false);
}

#[async_trait]
impl ConfirmationPrompt for StaticConfirmation {
    async fn confirm(&self, _prompt: &SoftConflictPrompt) -> bool {
        self.0
    }
}

/// Text for a conflict shown to the user.
pub fn conflict_message(conflict: &Conflict) -> String {
    match conflict {
        Conflict::Asset { asset_id, reason } => {
            format!("CONFLICT: Asset {asset_id} is unavailable. Reason: {reason}")
        }
        Conflict::Staff { staff_id, reason } => {
            format!("CONFLICT: Crew member {staff_id} is unavailable. Reason: {reason}")
        }
        Conflict::Domino(d) => format!("Double-booking with {d}"),
        Conflict::Weather { date } => format!("Rain is expected on {date}"),
    }
}

/// Text for a proposal that ended in an error.
///
/// Lookup failures read as "could not verify", never as a conflict.
pub fn error_message(error: &DispatchError) -> String {
    match error {
        e if e.is_lookup_failure() => {
            format!("Could not verify availability. Nothing was changed. ({e})")
        }
        DispatchError::WriteFailed { .. } => {
            "Failed to update job. Nothing was changed; please retry.".to_string()
        }
        DispatchError::ProposalInFlight(_) => {
            "This job is already being rescheduled. Please wait.".to_string()
        }
        other => other.to_string(),
    }
}
