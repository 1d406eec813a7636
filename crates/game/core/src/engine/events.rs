//! Turn lifecycle notifications.

use crate::action::Action;
use crate::resolution::ResolutionReport;
use crate::state::{PlayerId, TurnPhase, UnitId};

/// How a match ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum GameEndReason {
    /// The win condition named a winner.
    Victory,
    /// The win condition ended the match without a winner.
    Draw,
    /// The configured turn cap was reached first.
    TurnLimit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameOutcome {
    pub winner: Option<PlayerId>,
    pub reason: GameEndReason,
    /// Turn during which the match ended.
    pub turn: u32,
}

/// Notification emitted by the turn controller, in the order things happened.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnEvent {
    TurnStarted {
        turn: u32,
    },
    PhaseChanged {
        turn: u32,
        phase: TurnPhase,
    },
    /// Both locked actions, made visible to observers before they resolve.
    ActionsRevealed {
        turn: u32,
        first: Option<Action>,
        second: Option<Action>,
    },
    ActionsResolved {
        report: ResolutionReport,
    },
    TurnCompleted {
        turn: u32,
    },
    GameEnded {
        outcome: GameOutcome,
    },
}

impl TurnEvent {
    pub fn as_snake_case(&self) -> &'static str {
        match self {
            TurnEvent::TurnStarted { .. } => "turn_started",
            TurnEvent::PhaseChanged { .. } => "phase_changed",
            TurnEvent::ActionsRevealed { .. } => "actions_revealed",
            TurnEvent::ActionsResolved { .. } => "actions_resolved",
            TurnEvent::TurnCompleted { .. } => "turn_completed",
            TurnEvent::GameEnded { .. } => "game_ended",
        }
    }
}

/// Proof of acceptance returned to the submitting player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubmissionReceipt {
    pub player: PlayerId,
    pub actor: UnitId,
    pub turn: u32,
    /// True when this submission locked the second slot and triggered resolution.
    pub triggered_resolution: bool,
}
