use tracing::{info, warn};

use crate::action::Action;
use crate::resolution::ResolutionEngine;
use crate::state::{PlayerId, TurnPhase};

use super::{GameEndReason, GameOutcome, TurnController, TurnError, TurnEvent};

/// Phase machine methods for TurnController.
impl<'a> TurnController<'a> {
    /// Advances the selection timer by one tick; resolves the turn when it expires.
    ///
    /// Outside ActionSelection this is a no-op.
    pub fn tick(&mut self) -> Result<(), TurnError> {
        if self.state.turn.phase != TurnPhase::ActionSelection {
            return Ok(());
        }
        let turn = &mut self.state.turn;
        turn.selection_timer = turn.selection_timer.saturating_sub(1);
        if turn.selection_timer == 0 {
            return self.force_resolution();
        }
        Ok(())
    }

    /// Ends the selection window now. Players without a locked action pass.
    pub fn force_resolution(&mut self) -> Result<(), TurnError> {
        let phase = self.state.turn.phase;
        if phase != TurnPhase::ActionSelection {
            return Err(TurnError::illegal_transition(
                phase,
                TurnPhase::ActionResolution,
                self.state.turn.turn_number,
            ));
        }
        let missing: Vec<_> = PlayerId::ALL
            .into_iter()
            .filter(|&player| !self.state.turn.is_locked(player))
            .collect();
        info!(
            target: "core::turn",
            turn = self.state.turn.turn_number,
            passing = ?missing,
            "Selection window closed"
        );
        self.resolve_turn()
    }

    pub(super) fn resolve_turn(&mut self) -> Result<(), TurnError> {
        self.transition(TurnPhase::ActionResolution)?;
        let turn = self.state.turn.turn_number;

        let [first, second] = self.state.turn.take_actions();
        self.state.emit(TurnEvent::ActionsRevealed {
            turn,
            first: first.clone(),
            second: second.clone(),
        });

        let actions: Vec<Action> = [first, second].into_iter().flatten().collect();
        let report =
            ResolutionEngine::new(&self.state.validator, self.env.reborrow()).resolve(turn, actions);
        info!(
            target: "core::turn",
            turn,
            executed = ?report.executed_order,
            "Actions resolved"
        );
        self.state.emit(TurnEvent::ActionsResolved { report });

        // A lethal effect ends the match before end-of-turn bookkeeping.
        if self.env.oracle.is_game_over(&*self.env.units) {
            return self.finish(None);
        }

        self.transition(TurnPhase::TurnComplete)?;
        for unit in self.env.units.living_units() {
            if let Err(error) = self.env.ticker.tick_end_of_turn(unit, &mut *self.env.units) {
                warn!(target: "core::turn", %unit, %error, "End-of-turn tick failed");
            }
        }

        self.state.emit(TurnEvent::TurnCompleted { turn });

        if self.env.oracle.is_game_over(&*self.env.units) {
            return self.finish(None);
        }
        if turn >= self.state.config().max_turns {
            return self.finish(Some(GameEndReason::TurnLimit));
        }

        let timer = self.state.config().selection_timer_ticks;
        self.state.turn.advance(timer);
        self.transition(TurnPhase::ActionSelection)?;
        self.state.emit(TurnEvent::TurnStarted {
            turn: self.state.turn.turn_number,
        });
        Ok(())
    }

    /// Enters GameEnded. Without an explicit reason the oracle decides between
    /// victory and draw.
    fn finish(&mut self, reason: Option<GameEndReason>) -> Result<(), TurnError> {
        let (winner, reason) = match reason {
            Some(reason) => (None, reason),
            None => match self.env.oracle.winner(&*self.env.units) {
                Some(winner) => (Some(winner), GameEndReason::Victory),
                None => (None, GameEndReason::Draw),
            },
        };
        self.transition(TurnPhase::GameEnded)?;

        let outcome = GameOutcome {
            winner,
            reason,
            turn: self.state.turn.turn_number,
        };
        info!(
            target: "core::turn",
            turn = outcome.turn,
            winner = ?outcome.winner,
            %reason,
            "Game ended"
        );
        self.state.set_outcome(outcome);
        self.state.emit(TurnEvent::GameEnded { outcome });
        Ok(())
    }

    fn transition(&mut self, next: TurnPhase) -> Result<(), TurnError> {
        let current = self.state.turn.phase;
        if !current.can_transition_to(next) {
            return Err(TurnError::illegal_transition(
                current,
                next,
                self.state.turn.turn_number,
            ));
        }
        self.state.turn.phase = next;
        self.state.emit(TurnEvent::PhaseChanged {
            turn: self.state.turn.turn_number,
            phase: next,
        });
        Ok(())
    }
}
