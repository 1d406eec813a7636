//! Deterministic rules for simultaneous-turn tactical matches.
//!
//! `tactics-core` defines the canonical rules: the action model, the
//! authoritative validator, the priority/speed resolution engine and the turn
//! phase machine. Grid, units, ability effects and win conditions are injected
//! through the collaborator traits in [`env`]. All match state mutation flows
//! through [`engine::TurnController`]; the runtime crate depends on the types
//! re-exported here.
pub mod action;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod resolution;
pub mod state;
pub mod validation;

#[cfg(test)]
mod test_helpers;

pub use action::{
    AbilityId, AbilityRef, Action, ActionError, ActionKind, CancelReason, PriorityTier,
    ResolutionState, Target, TargetFlags,
};
pub use config::{GameConfig, ValidatorConfig};
pub use engine::{
    GameEndReason, GameOutcome, ProtocolError, SubmissionReceipt, SubmitError, TurnController,
    TurnError, TurnEvent,
};
pub use env::{
    AbilityExecutor, Board, CastRequest, CollaboratorError, EndOfTurnTicker, Env, GridProvider,
    StatusFlags, UnitRegistry, UnitView, WinConditionOracle,
};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use resolution::{ResolutionEngine, ResolutionReport, resolution_order};
pub use state::{ActionSlot, MatchState, PlayerId, Position, TurnPhase, TurnState, UnitId};
pub use validation::{
    Clock, ManualClock, SystemClock, ValidationCode, ValidationError, ValidationResult, Validator,
};
