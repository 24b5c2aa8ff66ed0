//! Reschedule orchestration.
//!
//! Every user action that moves a job (drag on the timeline, edit in the
//! detail panel) goes through [`ScheduleMutationCoordinator`]. It runs the
//! hard checks, asks about soft conflicts, and performs the single write.
//!
//! # Modules
//!
//! - **`mutation`**: the coordinator, requests and outcomes
//! - **`state`**: proposal lifecycle states and legal transitions
//! - **`prompt`**: confirmation callback and user-facing text
//!
//! # Severity
//!
//! | Conflict | Severity | Effect |
//! |----------|----------|--------|
//! | Asset double-booked or down | Hard | Move refused |
//! | Staff on leave or on another crew | Hard | Move refused |
//! | Crew overlap | Soft | One prompt listing every overlap |
//! | Rain on start date | Soft | One prompt |

mod mutation;
mod prompt;
mod state;

pub use mutation::{
    CrewChoice, RescheduleOutcome, RescheduleRequest, RescheduleStatus,
    ScheduleMutationCoordinator,
};
pub use prompt::{
    conflict_message, error_message, ConfirmationPrompt, SoftConflictPrompt, StaticConfirmation,
};
pub use state::{allowed_transitions, validate_transition, ProposalState, ProposalTrace};
