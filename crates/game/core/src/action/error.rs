//! Action errors.
//!
//! Structural problems with an action and misuse of its one-shot lifecycle.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{Position, UnitId};

use super::types::ResolutionState;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// The action already left Pending.
    #[error("action of {actor} already finalized as {state:?}")]
    AlreadyFinalized {
        actor: UnitId,
        state: ResolutionState,
    },

    /// Explicit movement path has no steps.
    #[error("movement path of {actor} is empty")]
    EmptyPath { actor: UnitId },

    /// Explicit movement path does not end at the declared destination.
    #[error("movement path of {actor} ends at {path_end}, not at destination {destination}")]
    PathDestinationMismatch {
        actor: UnitId,
        destination: Position,
        path_end: Position,
    },

    /// Two consecutive path steps are not orthogonally adjacent.
    #[error("movement path of {actor} jumps from {from} to {to}")]
    DisjointPath {
        actor: UnitId,
        from: Position,
        to: Position,
    },
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AlreadyFinalized { .. } => ErrorSeverity::Internal,
            Self::EmptyPath { .. }
            | Self::PathDestinationMismatch { .. }
            | Self::DisjointPath { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyFinalized { .. } => "ACTION_ALREADY_FINALIZED",
            Self::EmptyPath { .. } => "ACTION_EMPTY_PATH",
            Self::PathDestinationMismatch { .. } => "ACTION_PATH_DESTINATION_MISMATCH",
            Self::DisjointPath { .. } => "ACTION_DISJOINT_PATH",
        }
    }
}
