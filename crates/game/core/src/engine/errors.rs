//! Error types for the turn controller.

use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::state::{PlayerId, TurnPhase};
use crate::validation::ValidationError;

/// Submission refused because of where the match is, not what was submitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("submissions are closed during {phase}")]
    WrongPhase { phase: TurnPhase },

    #[error("player {player} already locked an action this turn")]
    AlreadyLocked { player: PlayerId },
}

impl GameError for ProtocolError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::WrongPhase { .. } => "WRONG_PHASE",
            Self::AlreadyLocked { .. } => "ALREADY_LOCKED",
        }
    }
}

/// Internal failures of the phase state machine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("illegal phase transition from {from} to {to}")]
    IllegalTransition {
        from: TurnPhase,
        to: TurnPhase,
        context: ErrorContext,
    },
}

impl TurnError {
    pub(crate) fn illegal_transition(from: TurnPhase, to: TurnPhase, turn: u32) -> Self {
        Self::IllegalTransition {
            from,
            to,
            context: ErrorContext::new(turn).with_message("phase edge not in the turn state machine"),
        }
    }
}

impl GameError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::IllegalTransition { context, .. } => Some(context),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::IllegalTransition { .. } => "TURN_ILLEGAL_TRANSITION",
        }
    }
}

/// Why [`TurnController::submit`](super::TurnController::submit) refused an action.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("action rejected: {0}")]
    Rejected(#[from] ValidationError),

    /// The action was locked but resolving the turn hit an internal fault.
    #[error(transparent)]
    Turn(#[from] TurnError),
}

impl GameError for SubmitError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Protocol(error) => error.severity(),
            Self::Rejected(error) => error.severity(),
            Self::Turn(error) => error.severity(),
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::Turn(error) => error.context(),
            Self::Protocol(_) | Self::Rejected(_) => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Protocol(error) => error.error_code(),
            Self::Rejected(error) => error.error_code(),
            Self::Turn(error) => error.error_code(),
        }
    }
}
