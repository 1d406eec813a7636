//! Turn controller: the phase state machine driving a match.
//!
//! A [`TurnController`] is built per command around the borrowed [`MatchState`]
//! and the collaborator [`Env`]. Submissions lock per-player slots; once both
//! are locked (or the selection timer runs out) the turn resolves synchronously
//! through [`crate::resolution::ResolutionEngine`], runs end-of-turn bookkeeping
//! and either opens the next turn or ends the match. Observers read the buffered
//! [`TurnEvent`]s from the state.

mod errors;
mod events;
mod turns;

pub use errors::{ProtocolError, SubmitError, TurnError};
pub use events::{GameEndReason, GameOutcome, SubmissionReceipt, TurnEvent};

use tracing::{debug, error};

use crate::action::Action;
use crate::env::Env;
use crate::state::{MatchState, PlayerId, TurnPhase};

pub struct TurnController<'a> {
    state: &'a mut MatchState,
    env: Env<'a>,
}

impl<'a> TurnController<'a> {
    pub fn new(state: &'a mut MatchState, env: Env<'a>) -> Self {
        Self { state, env }
    }

    pub fn state(&self) -> &MatchState {
        &*self.state
    }

    /// Offers `action` for `player`'s slot in the current turn.
    ///
    /// Protocol and validation rejections leave the turn state untouched. When
    /// the submission locks the second slot the turn is resolved before this
    /// returns.
    pub fn submit(
        &mut self,
        player: PlayerId,
        mut action: Action,
    ) -> Result<SubmissionReceipt, SubmitError> {
        let phase = self.state.turn.phase;
        if phase != TurnPhase::ActionSelection {
            debug!(target: "core::turn", %player, %phase, "Submission outside selection");
            return Err(ProtocolError::WrongPhase { phase }.into());
        }
        if self.state.turn.is_locked(player) {
            debug!(target: "core::turn", %player, "Player already locked");
            return Err(ProtocolError::AlreadyLocked { player }.into());
        }

        self.state
            .validator
            .validate_submission(self.env.board(), player, &action)?;

        let turn = self.state.turn.turn_number;
        action.stamp_turn(turn);
        let actor = action.actor;
        let slot = self.state.turn.slot_mut(player);
        slot.action = Some(action);
        slot.locked = true;
        debug!(target: "core::turn", %player, %actor, turn, "Action locked");

        let triggered_resolution = self.state.turn.both_locked();
        if triggered_resolution {
            self.resolve_turn().inspect_err(|error| {
                error!(target: "core::turn", turn, %error, "Turn resolution aborted");
            })?;
        }

        Ok(SubmissionReceipt {
            player,
            actor,
            turn,
            triggered_resolution,
        })
    }

    /// Boolean form of [`TurnController::submit`]: true when the action was accepted.
    pub fn submit_action(&mut self, player: PlayerId, action: Action) -> bool {
        self.submit(player, action).is_ok()
    }
}
