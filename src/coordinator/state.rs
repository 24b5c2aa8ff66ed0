//! Proposal state machine.
//!
//! ```text
//! Idle -> Validating -> Blocked ---------------------> Idle
//!                    -> AwaitingConfirmation -+-> Committing -> Idle
//!                    -> Committing            |
//!                    -> Idle (lookup failure) +-> Idle (declined / lookup failure)
//! ```
//!
//! `AwaitingConfirmation` may repeat: a crew-overlap prompt can be
//! followed by a separate weather prompt.

use serde::{Deserialize, Serialize};

use crate::error::DispatchError;

/// Where a reschedule proposal is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalState {
    /// Nothing in progress.
    Idle,
    /// Running hard checks.
    Validating,
    /// A hard conflict was found; nothing will be written.
    Blocked,
    /// Waiting on the user to accept a soft conflict.
    AwaitingConfirmation,
    /// Writing the new schedule.
    Committing,
}

/// States reachable from `from` in one step.
pub fn allowed_transitions(from: ProposalState) -> &'static [ProposalState] {
    use ProposalState::*;
    match from {
        Idle => &[Validating],
        Validating => &[Blocked, AwaitingConfirmation, Committing, Idle],
        AwaitingConfirmation => &[AwaitingConfirmation, Committing, Idle],
        Blocked => &[Idle],
        Committing => &[Idle],
    }
}

/// Validates one step.
pub fn validate_transition(from: ProposalState, to: ProposalState) -> Result<(), DispatchError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(DispatchError::IllegalTransition { from, to })
    }
}

/// The states one proposal passed through, starting at `Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalTrace {
    states: Vec<ProposalState>,
}

impl Default for ProposalTrace {
    fn default() -> Self {
        Self {
            states: vec![ProposalState::Idle],
        }
    }
}

impl ProposalTrace {
    /// Starts a trace at `Idle`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn current(&self) -> ProposalState {
        self.states.last().copied().unwrap_or(ProposalState::Idle)
    }

    /// Moves to `to`, if legal.
    pub fn advance(&mut self, to: ProposalState) -> Result<(), DispatchError> {
        validate_transition(self.current(), to)?;
        self.states.push(to);
        Ok(())
    }

    /// All states visited, in order.
    pub fn states(&self) -> &[ProposalState] {
        &self.states
    }

    /// Whether the proposal ever reached `state`.
    pub fn visited(&self, state: ProposalState) -> bool {
        self.states.contains(&state)
    }
}
