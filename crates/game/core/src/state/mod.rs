//! Authoritative match state.
//!
//! [`MatchState`] owns everything the turn controller mutates: the per-turn slots,
//! the validator with its submission history, the buffered notifications and the
//! final outcome. Unit and grid data live behind the collaborator traits in
//! [`crate::env`] and are never copied in here.
pub mod types;

pub use types::{ActionSlot, PlayerId, Position, TurnPhase, TurnState, UnitId};

use std::mem;

use crate::config::GameConfig;
use crate::engine::{GameOutcome, TurnEvent};
use crate::validation::{Clock, Validator};

#[derive(Debug)]
pub struct MatchState {
    pub turn: TurnState,
    pub validator: Validator,
    config: GameConfig,
    events: Vec<TurnEvent>,
    outcome: Option<GameOutcome>,
}

impl MatchState {
    /// Starts a match at turn 1 in ActionSelection.
    pub fn new(config: GameConfig) -> Self {
        let validator = Validator::new(config.validator.clone());
        Self::with_validator(config, validator)
    }

    /// Same as [`MatchState::new`] with an explicit time source for rate limiting.
    pub fn with_clock(config: GameConfig, clock: Box<dyn Clock>) -> Self {
        let validator = Validator::with_clock(config.validator.clone(), clock);
        Self::with_validator(config, validator)
    }

    fn with_validator(config: GameConfig, validator: Validator) -> Self {
        let turn = TurnState::new(config.selection_timer_ticks);
        let events = vec![TurnEvent::TurnStarted {
            turn: turn.turn_number,
        }];
        Self {
            turn,
            validator,
            config,
            events,
            outcome: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> TurnPhase {
        self.turn.phase
    }

    pub fn turn_number(&self) -> u32 {
        self.turn.turn_number
    }

    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.turn.phase.is_terminal()
    }

    /// Takes the notifications emitted since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<TurnEvent> {
        mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: TurnEvent) {
        self.events.push(event);
    }

    pub(crate) fn set_outcome(&mut self, outcome: GameOutcome) {
        self.outcome = Some(outcome);
    }
}
