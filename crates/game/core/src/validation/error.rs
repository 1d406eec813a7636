//! Validation outcomes.
//!
//! Every rejection carries a stable [`ValidationCode`] so that the client (and the
//! tests) can tell *why* an action was refused, plus the numbers that made it fail.

use crate::action::AbilityId;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{PlayerId, Position, UnitId};

/// Stable, machine-readable rejection codes. Part of the client contract.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationCode {
    InvalidInput,
    InvalidOwnership,
    ImpossibleRange,
    InvalidTarget,
    ImpossibleCost,
    OverloadRequired,
    RapidSubmission,
    OutOfBounds,
    ImpossibleMovement,
    PositionOccupied,
}

/// Why a proposed action is inadmissible.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid input for {unit}: {reason}")]
    InvalidInput { unit: UnitId, reason: &'static str },

    #[error("{unit} belongs to player {owner}, not to submitting player {submitter}")]
    InvalidOwnership {
        unit: UnitId,
        owner: PlayerId,
        submitter: PlayerId,
    },

    #[error("target is {distance} tiles away, beyond the possible range of {limit}")]
    ImpossibleRange { distance: u32, limit: u32 },

    #[error("invalid target: {reason}")]
    InvalidTarget { reason: &'static str },

    #[error("{ability} costs {cost}, above the resource ceiling of {ceiling}")]
    ImpossibleCost {
        ability: AbilityId,
        cost: u32,
        ceiling: u32,
    },

    #[error("{ability} requires {unit} to be in overload")]
    OverloadRequired { unit: UnitId, ability: AbilityId },

    #[error("player {player} submitted {count} actions inside the window (limit {limit})")]
    RapidSubmission {
        player: PlayerId,
        count: usize,
        limit: usize,
    },

    #[error("position {position} is outside the grid")]
    OutOfBounds { position: Position },

    #[error("move of {distance} tiles exceeds the possible movement of {limit}")]
    ImpossibleMovement { distance: u32, limit: u32 },

    #[error("position {position} is already occupied")]
    PositionOccupied { position: Position },
}

impl ValidationError {
    pub fn code(&self) -> ValidationCode {
        match self {
            Self::InvalidInput { .. } => ValidationCode::InvalidInput,
            Self::InvalidOwnership { .. } => ValidationCode::InvalidOwnership,
            Self::ImpossibleRange { .. } => ValidationCode::ImpossibleRange,
            Self::InvalidTarget { .. } => ValidationCode::InvalidTarget,
            Self::ImpossibleCost { .. } => ValidationCode::ImpossibleCost,
            Self::OverloadRequired { .. } => ValidationCode::OverloadRequired,
            Self::RapidSubmission { .. } => ValidationCode::RapidSubmission,
            Self::OutOfBounds { .. } => ValidationCode::OutOfBounds,
            Self::ImpossibleMovement { .. } => ValidationCode::ImpossibleMovement,
            Self::PositionOccupied { .. } => ValidationCode::PositionOccupied,
        }
    }
}

impl GameError for ValidationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::RapidSubmission { .. } | Self::PositionOccupied { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::OverloadRequired { .. } => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self.code() {
            ValidationCode::InvalidInput => "INVALID_INPUT",
            ValidationCode::InvalidOwnership => "INVALID_OWNERSHIP",
            ValidationCode::ImpossibleRange => "IMPOSSIBLE_RANGE",
            ValidationCode::InvalidTarget => "INVALID_TARGET",
            ValidationCode::ImpossibleCost => "IMPOSSIBLE_COST",
            ValidationCode::OverloadRequired => "OVERLOAD_REQUIRED",
            ValidationCode::RapidSubmission => "RAPID_SUBMISSION",
            ValidationCode::OutOfBounds => "OUT_OF_BOUNDS",
            ValidationCode::ImpossibleMovement => "IMPOSSIBLE_MOVEMENT",
            ValidationCode::PositionOccupied => "POSITION_OCCUPIED",
        }
    }
}

/// Outcome of a single validation call: `Ok` means admissible.
pub type ValidationResult = Result<(), ValidationError>;
