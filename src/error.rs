//! Error types.
//!
//! Conflicts are not errors. These types cover the cases where the
//! dispatch core could not reach a decision at all:
//! - a data source failed or timed out (fail closed: nothing is committed)
//! - the single commit write failed
//! - the request itself was malformed

use std::time::Duration;

use crate::coordinator::ProposalState;

/// A data source could not answer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// Backend unreachable or refused the request.
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// Backend answered with data the core cannot interpret.
    #[error("malformed data: {0}")]
    Malformed(String),
}

/// The commit write failed. The job record is left as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommitError {
    /// The job no longer exists.
    #[error("job not found")]
    NotFound,

    /// Another write landed first.
    #[error("stale revision: expected {expected}, found {actual}")]
    StaleRevision {
        /// Revision the proposal was validated against.
        expected: u64,
        /// Revision currently stored.
        actual: u64,
    },

    /// Backend failure.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Reasons a reschedule proposal ended without a decision.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The job being moved does not exist.
    #[error("job not found: {0}")]
    JobNotFound(String),

    /// The request is malformed (e.g., empty asset ID).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A lookup failed; availability could not be verified.
    #[error("could not verify availability ({what}): {source}")]
    LookupFailed {
        /// What was being looked up.
        what: String,
        /// Underlying source error.
        #[source]
        source: SourceError,
    },

    /// A lookup did not answer in time; availability could not be verified.
    #[error("could not verify availability ({what}): timed out after {timeout:?}")]
    LookupTimedOut {
        /// What was being looked up.
        what: String,
        /// The bound that was exceeded.
        timeout: Duration,
    },

    /// Another proposal for this job is still running.
    #[error("a reschedule of job {0} is already in flight")]
    ProposalInFlight(String),

    /// The proposal state machine was driven through an illegal step.
    #[error("illegal proposal transition: {from:?} -> {to:?}")]
    IllegalTransition {
        /// State before the step.
        from: ProposalState,
        /// Attempted next state.
        to: ProposalState,
    },

    /// The commit write failed; the job is unchanged.
    #[error("failed to update job {job_id}: {source}")]
    WriteFailed {
        /// Job being written.
        job_id: String,
        /// Underlying commit error.
        #[source]
        source: CommitError,
    },
}

impl DispatchError {
    /// Whether this error means availability could not be verified.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            DispatchError::LookupFailed { .. } | DispatchError::LookupTimedOut { .. }
        )
    }

    /// Whether the caller may offer the user a retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            DispatchError::LookupFailed { .. }
            | DispatchError::LookupTimedOut { .. }
            | DispatchError::ProposalInFlight(_) => true,
            DispatchError::WriteFailed { source, .. } => !matches!(source, CommitError::NotFound),
            DispatchError::JobNotFound(_)
            | DispatchError::InvalidRequest(_)
            | DispatchError::IllegalTransition { .. } => false,
        }
    }

    pub(crate) fn lookup(what: impl Into<String>, source: SourceError) -> Self {
        DispatchError::LookupFailed {
            what: what.into(),
            source,
        }
    }
}
