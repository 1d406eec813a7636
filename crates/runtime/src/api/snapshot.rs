//! Read-only views returned by runtime queries.

use serde::{Deserialize, Serialize};
use tactics_core::{GameOutcome, MatchState, PlayerId, TurnPhase};

/// Copy of the turn bookkeeping at the time of the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSnapshot {
    pub turn_number: u32,
    pub phase: TurnPhase,
    pub selection_timer: u32,
    /// Players whose slot is locked for the current turn.
    pub locked: Vec<PlayerId>,
    pub outcome: Option<GameOutcome>,
}

impl TurnSnapshot {
    pub(crate) fn capture(state: &MatchState) -> Self {
        Self {
            turn_number: state.turn_number(),
            phase: state.phase(),
            selection_timer: state.turn.selection_timer,
            locked: PlayerId::ALL
                .into_iter()
                .filter(|&player| state.turn.is_locked(player))
                .collect(),
            outcome: state.outcome().copied(),
        }
    }

    pub fn is_locked(&self, player: PlayerId) -> bool {
        self.locked.contains(&player)
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }
}
