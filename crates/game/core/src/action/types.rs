//! Core action types.
//!
//! - `PriorityTier`: gross resolution order within a turn
//! - `ActionKind`: what the unit does (move or use an ability)
//! - `Action`: one player's intent for one unit in one turn
//! - `ResolutionState` / `CancelReason`: the single, final outcome of an action

use core::fmt;

use crate::state::{Position, UnitId};
use crate::validation::ValidationCode;

use super::ability::AbilityRef;
use super::error::ActionError;
use super::targeting::Target;

// ============================================================================
// Priority Tier
// ============================================================================

/// Priority tier of an action. Declaration order is resolution order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum PriorityTier {
    Reactive,
    DefensiveUtility,
    Movement,
    Offensive,
}

// ============================================================================
// Action Kind
// ============================================================================

/// What the acting unit does this turn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    /// Relocate to `destination`. `path` is an explicit route; when absent the
    /// route is left to the pathfinding collaborator.
    Move {
        destination: Position,
        path: Option<Vec<Position>>,
    },

    /// Use an ability on a target.
    UseAbility { ability: AbilityRef, target: Target },
}

impl ActionKind {
    pub fn as_snake_case(&self) -> &'static str {
        match self {
            ActionKind::Move { .. } => "move",
            ActionKind::UseAbility { .. } => "use_ability",
        }
    }
}

// ============================================================================
// Resolution State
// ============================================================================

/// Why an action was canceled instead of executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CancelReason {
    /// Failed the pre-resolution partition (dead, stunned, silenced, malformed, stale).
    CannotExecute,
    /// An earlier action in the same batch made this one illegal.
    BecameInvalid(ValidationCode),
    /// The unit cannot pay the cost from its actual pool.
    InsufficientResources,
    /// The ability is still cooling down.
    OnCooldown,
    /// The ability needs Overload and the unit is not in it.
    OverloadRequired,
    /// The collaborator reported failure or misbehaved.
    ExecutionFailed,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::CannotExecute => write!(f, "cannot execute"),
            CancelReason::BecameInvalid(code) => {
                write!(f, "became invalid during resolution ({code})")
            }
            CancelReason::InsufficientResources => write!(f, "insufficient resources"),
            CancelReason::OnCooldown => write!(f, "ability on cooldown"),
            CancelReason::OverloadRequired => write!(f, "ability requires overload"),
            CancelReason::ExecutionFailed => write!(f, "execution failed"),
        }
    }
}

/// Lifecycle of an action: Pending until finalized exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResolutionState {
    #[default]
    Pending,
    Resolved,
    Canceled(CancelReason),
}

impl ResolutionState {
    pub fn is_pending(self) -> bool {
        matches!(self, ResolutionState::Pending)
    }
}

// ============================================================================
// Action
// ============================================================================

/// One player's chosen intent for one unit in one turn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Action {
    pub actor: UnitId,
    /// Turn the action belongs to. Stamped by the turn controller on acceptance.
    pub turn: u32,
    pub kind: ActionKind,
    resolution: ResolutionState,
}

impl Action {
    pub fn new(actor: UnitId, kind: ActionKind) -> Self {
        Self {
            actor,
            turn: 0,
            kind,
            resolution: ResolutionState::Pending,
        }
    }

    /// Move to `destination`, leaving the route to the pathfinding collaborator.
    pub fn move_to(actor: UnitId, destination: Position) -> Self {
        Self::new(
            actor,
            ActionKind::Move {
                destination,
                path: None,
            },
        )
    }

    /// Move along an explicit path; the destination is the last step.
    pub fn move_along(actor: UnitId, path: Vec<Position>) -> Self {
        let destination = path.last().copied().unwrap_or_default();
        Self::new(
            actor,
            ActionKind::Move {
                destination,
                path: Some(path),
            },
        )
    }

    pub fn use_ability(actor: UnitId, ability: AbilityRef, target: Target) -> Self {
        Self::new(actor, ActionKind::UseAbility { ability, target })
    }

    /// Priority tier: Movement for moves, the ability's own tier otherwise.
    pub fn priority_tier(&self) -> PriorityTier {
        match &self.kind {
            ActionKind::Move { .. } => PriorityTier::Movement,
            ActionKind::UseAbility { ability, .. } => ability.tier,
        }
    }

    pub fn ability(&self) -> Option<&AbilityRef> {
        match &self.kind {
            ActionKind::UseAbility { ability, .. } => Some(ability),
            ActionKind::Move { .. } => None,
        }
    }

    pub fn resolution(&self) -> ResolutionState {
        self.resolution
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution == ResolutionState::Resolved
    }

    pub fn cancel_reason(&self) -> Option<CancelReason> {
        match self.resolution {
            ResolutionState::Canceled(reason) => Some(reason),
            _ => None,
        }
    }

    pub(crate) fn stamp_turn(&mut self, turn: u32) {
        self.turn = turn;
    }

    /// Marks the action Resolved. Fails if it was already finalized.
    pub fn resolve(&mut self) -> Result<(), ActionError> {
        self.finalize(ResolutionState::Resolved)
    }

    /// Marks the action Canceled. Fails if it was already finalized.
    pub fn cancel(&mut self, reason: CancelReason) -> Result<(), ActionError> {
        self.finalize(ResolutionState::Canceled(reason))
    }

    fn finalize(&mut self, next: ResolutionState) -> Result<(), ActionError> {
        if !self.resolution.is_pending() {
            return Err(ActionError::AlreadyFinalized {
                actor: self.actor,
                state: self.resolution,
            });
        }
        self.resolution = next;
        Ok(())
    }

    /// Structural checks that need no game state.
    ///
    /// An explicit path must be non-empty, contiguous from `origin`, and end at
    /// the destination.
    pub fn check_well_formed(&self, origin: Position) -> Result<(), ActionError> {
        let ActionKind::Move {
            destination,
            path: Some(path),
        } = &self.kind
        else {
            return Ok(());
        };

        let Some(last) = path.last() else {
            return Err(ActionError::EmptyPath { actor: self.actor });
        };
        if last != destination {
            return Err(ActionError::PathDestinationMismatch {
                actor: self.actor,
                destination: *destination,
                path_end: *last,
            });
        }

        let mut previous = origin;
        for &step in path {
            if !previous.is_adjacent(step) {
                return Err(ActionError::DisjointPath {
                    actor: self.actor,
                    from: previous,
                    to: step,
                });
            }
            previous = step;
        }

        Ok(())
    }
}
