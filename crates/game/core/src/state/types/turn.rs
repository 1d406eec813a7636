//! Per-turn bookkeeping owned by the turn controller.

use crate::action::Action;

use super::common::PlayerId;

/// Phase of the turn lifecycle.
///
/// Legal edges:
///
/// ```text
/// ActionSelection ──► ActionResolution ──► TurnComplete ──► ActionSelection (turn + 1)
///                            │                   │
///                            └──► GameEnded ◄────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TurnPhase {
    ActionSelection,
    ActionResolution,
    TurnComplete,
    GameEnded,
}

impl TurnPhase {
    /// Returns true if `next` is a legal successor of this phase.
    pub const fn can_transition_to(self, next: TurnPhase) -> bool {
        matches!(
            (self, next),
            (TurnPhase::ActionSelection, TurnPhase::ActionResolution)
                | (TurnPhase::ActionResolution, TurnPhase::TurnComplete)
                | (TurnPhase::ActionResolution, TurnPhase::GameEnded)
                | (TurnPhase::TurnComplete, TurnPhase::ActionSelection)
                | (TurnPhase::TurnComplete, TurnPhase::GameEnded)
        )
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, TurnPhase::GameEnded)
    }
}

/// One player's action slot for the current turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionSlot {
    pub action: Option<Action>,
    pub locked: bool,
}

impl ActionSlot {
    fn clear(&mut self) {
        self.action = None;
        self.locked = false;
    }
}

/// Turn state: number, phase, both action slots and the selection timer.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// Monotonically increasing, starts at 1.
    pub turn_number: u32,
    pub phase: TurnPhase,
    slots: [ActionSlot; 2],
    /// Remaining ticks in the current selection window.
    pub selection_timer: u32,
}

impl TurnState {
    pub fn new(selection_timer: u32) -> Self {
        Self {
            turn_number: 1,
            phase: TurnPhase::ActionSelection,
            slots: Default::default(),
            selection_timer,
        }
    }

    pub fn slot(&self, player: PlayerId) -> &ActionSlot {
        &self.slots[player.index()]
    }

    pub fn slot_mut(&mut self, player: PlayerId) -> &mut ActionSlot {
        &mut self.slots[player.index()]
    }

    pub fn action(&self, player: PlayerId) -> Option<&Action> {
        self.slot(player).action.as_ref()
    }

    pub fn is_locked(&self, player: PlayerId) -> bool {
        self.slot(player).locked
    }

    /// True iff both per-player lock flags are set.
    pub fn both_locked(&self) -> bool {
        self.slots.iter().all(|slot| slot.locked)
    }

    /// Removes both actions from their slots, leaving the lock flags untouched.
    pub(crate) fn take_actions(&mut self) -> [Option<Action>; 2] {
        [self.slots[0].action.take(), self.slots[1].action.take()]
    }

    /// Clears all per-turn state and advances to the next turn number.
    pub(crate) fn advance(&mut self, selection_timer: u32) {
        self.turn_number += 1;
        self.slots.iter_mut().for_each(ActionSlot::clear);
        self.selection_timer = selection_timer;
    }
}
