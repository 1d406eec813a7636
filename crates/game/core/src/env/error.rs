//! Collaborator errors.
//!
//! Raised when an injected collaborator cannot honour a request. The core never
//! expects these during normal play; they are converted into cancellations of the
//! affected action and logged.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{Position, UnitId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    /// The grid refused to place a unit on an occupied cell.
    #[error("cell {0} is already occupied")]
    CellOccupied(Position),

    /// The grid was asked to touch a cell outside the board.
    #[error("cell {0} is outside the grid")]
    OutOfBounds(Position),

    /// The unit registry has no record of the unit.
    #[error("unit {0} is not registered")]
    UnitNotFound(UnitId),

    /// Any other collaborator failure.
    #[error("collaborator fault: {0}")]
    Fault(String),
}

impl GameError for CollaboratorError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CellOccupied(_) => "COLLABORATOR_CELL_OCCUPIED",
            Self::OutOfBounds(_) => "COLLABORATOR_OUT_OF_BOUNDS",
            Self::UnitNotFound(_) => "COLLABORATOR_UNIT_NOT_FOUND",
            Self::Fault(_) => "COLLABORATOR_FAULT",
        }
    }
}
