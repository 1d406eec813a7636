//! Event payloads published by the runtime.

use serde::{Deserialize, Serialize};
use tactics_core::{GameError, PlayerId, SubmissionReceipt, SubmitError, UnitId};

/// Outcome of a single action submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionEvent {
    /// The action was locked into the player's slot.
    Accepted {
        player: PlayerId,
        actor: UnitId,
        turn: u32,
    },

    /// The action was refused; the slot is unchanged.
    Rejected {
        player: PlayerId,
        actor: UnitId,
        turn: u32,
        /// Stable machine-readable code (e.g. `OUT_OF_RANGE`, `WRONG_PHASE`).
        code: String,
        message: String,
    },
}

impl SubmissionEvent {
    pub(crate) fn accepted(receipt: &SubmissionReceipt) -> Self {
        Self::Accepted {
            player: receipt.player,
            actor: receipt.actor,
            turn: receipt.turn,
        }
    }

    pub(crate) fn rejected(player: PlayerId, actor: UnitId, turn: u32, error: &SubmitError) -> Self {
        Self::Rejected {
            player,
            actor,
            turn,
            code: error.error_code().to_string(),
            message: error.to_string(),
        }
    }

    pub fn player(&self) -> PlayerId {
        match self {
            Self::Accepted { player, .. } | Self::Rejected { player, .. } => *player,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}
