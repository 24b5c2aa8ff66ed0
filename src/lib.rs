//! Dispatch conflict resolution for day-granular job scheduling.
//!
//! Decides whether a proposed move of a job (new start date, new crew,
//! new duration) is safe, asks the user about risky-but-allowed moves,
//! and commits the change in one write. The crate owns no storage and no
//! UI: the host supplies data through the [`store`] traits and answers
//! prompts through [`coordinator::ConfirmationPrompt`].
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Job`, `Asset`, `Roster`, `DateWindow`, `Conflict`
//! - **`store`**: Async data-access contracts the host implements
//! - **`memory`**: In-process store for tests and embedded hosts
//! - **`checks`**: Asset, staff and crew-overlap checkers
//! - **`weather`**: Forecast cache and rain advisory
//! - **`coordinator`**: `ScheduleMutationCoordinator`, proposal lifecycle, prompts
//! - **`validation`**: Job-list integrity checks (duplicate IDs, dependency cycles)
//! - **`config`**: Timeouts, active statuses, weather policy (TOML)
//! - **`error`**: Lookup, commit and dispatch errors
//!
//! # Decision order
//!
//! Assets, then staff (both hard), then crew overlap, then rain (both
//! soft), then commit. A failed lookup at any step aborts with nothing
//! written.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4

pub mod checks;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod memory;
pub mod models;
pub mod store;
pub mod validation;
pub mod weather;

#[cfg(test)]
mod testing;

pub use config::DispatchConfig;
pub use coordinator::{
    RescheduleOutcome, RescheduleRequest, RescheduleStatus, ScheduleMutationCoordinator,
};
pub use error::DispatchError;
