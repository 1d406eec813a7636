//! Single-pass execution of a turn's locked actions.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error, warn};

use crate::action::{AbilityRef, Action, ActionKind, CancelReason, Target};
use crate::env::{CastRequest, CollaboratorError, Env, GridProvider, UnitRegistry, UnitView};
use crate::state::{Position, UnitId};
use crate::validation::Validator;

use super::resolution_order;

/// Everything that happened while resolving one turn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolutionReport {
    pub turn: u32,
    /// Actors whose action resolved, in execution order.
    pub executed_order: Vec<UnitId>,
    /// Every input action, finalized, in input order.
    pub actions: Vec<Action>,
}

impl ResolutionReport {
    pub fn action_of(&self, actor: UnitId) -> Option<&Action> {
        self.actions.iter().find(|action| action.actor == actor)
    }
}

/// Resolves the locked actions of one turn against the injected collaborators.
///
/// Failures are local: a canceled action never stops the rest of the batch.
pub struct ResolutionEngine<'a> {
    validator: &'a Validator,
    env: Env<'a>,
}

impl<'a> ResolutionEngine<'a> {
    pub fn new(validator: &'a Validator, env: Env<'a>) -> Self {
        Self { validator, env }
    }

    pub fn resolve(mut self, turn: u32, mut actions: Vec<Action>) -> ResolutionReport {
        let mut executable = Vec::with_capacity(actions.len());
        for (index, action) in actions.iter_mut().enumerate() {
            if !action.resolution().is_pending() {
                continue;
            }
            match self.partition(turn, action) {
                Ok(()) => executable.push(index),
                Err(reason) => finalize(action, Err(reason)),
            }
        }

        let ordered = {
            let candidates: Vec<Action> = executable.iter().map(|&i| actions[i].clone()).collect();
            resolution_order(&candidates, &*self.env.units)
                .into_iter()
                .map(|position| executable[position])
                .collect::<Vec<_>>()
        };

        let mut executed_order = Vec::with_capacity(ordered.len());
        for index in ordered {
            let action = &mut actions[index];
            let outcome = self.run(action);
            if outcome.is_ok() {
                executed_order.push(action.actor);
            }
            finalize(action, outcome);
        }

        ResolutionReport {
            turn,
            executed_order,
            actions,
        }
    }

    /// Pre-sort gate: the unit must be able to act at all.
    fn partition(&self, turn: u32, action: &Action) -> Result<(), CancelReason> {
        if action.turn != turn {
            debug!(
                target: "core::resolution",
                actor = %action.actor,
                stamped = action.turn,
                turn,
                "Action belongs to another turn"
            );
            return Err(CancelReason::CannotExecute);
        }

        let unit = self
            .env
            .units
            .unit(action.actor)
            .filter(|unit| unit.alive)
            .ok_or(CancelReason::CannotExecute)?;
        check_status(&unit, action)?;

        if action.check_well_formed(unit.position).is_err() {
            return Err(CancelReason::CannotExecute);
        }
        Ok(())
    }

    fn run(&mut self, action: &Action) -> Result<(), CancelReason> {
        let board = self.env.board();
        let Some(unit) = board.units.unit(action.actor) else {
            return Err(CancelReason::CannotExecute);
        };
        // An earlier action this turn may have stunned or silenced the unit.
        check_status(&unit, action)?;

        if let Err(error) = self.validator.revalidate(board, unit.owner, action) {
            return Err(CancelReason::BecameInvalid(error.code()));
        }

        let env = &mut self.env;
        let result = panic::catch_unwind(AssertUnwindSafe(|| match &action.kind {
            ActionKind::Move { destination, .. } => {
                move_unit(&mut *env.grid, &mut *env.units, &unit, *destination)
                    .map_err(Failure::Collaborator)
            }
            ActionKind::UseAbility { ability, target } => cast(env, &unit, ability, *target),
        }));

        match result {
            Ok(Ok(())) => Ok(()),
            Ok(Err(Failure::Cancel(reason))) => Err(reason),
            Ok(Err(Failure::Rejected)) => {
                debug!(
                    target: "core::resolution",
                    actor = %action.actor,
                    "Ability effect failed to apply"
                );
                Err(CancelReason::ExecutionFailed)
            }
            Ok(Err(Failure::Collaborator(fault))) => {
                warn!(
                    target: "core::resolution",
                    actor = %action.actor,
                    error = %fault,
                    "Collaborator failed during execution"
                );
                Err(CancelReason::ExecutionFailed)
            }
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "non-string panic payload".to_string());
                error!(
                    target: "core::resolution",
                    actor = %action.actor,
                    panic = %message,
                    "Collaborator panicked; canceling action"
                );
                Err(CancelReason::ExecutionFailed)
            }
        }
    }
}

enum Failure {
    Cancel(CancelReason),
    /// The executor reported that the effect did not apply.
    Rejected,
    Collaborator(CollaboratorError),
}

fn check_status(unit: &UnitView, action: &Action) -> Result<(), CancelReason> {
    let silenced = unit.is_silenced() && matches!(action.kind, ActionKind::UseAbility { .. });
    if unit.is_stunned() || silenced {
        debug!(
            target: "core::resolution",
            actor = %unit.id,
            status = ?unit.status,
            "Unit cannot act"
        );
        return Err(CancelReason::CannotExecute);
    }
    Ok(())
}

fn move_unit(
    grid: &mut dyn GridProvider,
    units: &mut dyn UnitRegistry,
    unit: &UnitView,
    destination: Position,
) -> Result<(), CollaboratorError> {
    grid.vacate(unit.position)?;
    if let Err(error) = grid.occupy(destination, unit.id) {
        // Put the unit back where it was before reporting.
        grid.occupy(unit.position, unit.id)?;
        return Err(error);
    }
    units.set_position(unit.id, destination)
}

fn cast(
    env: &mut Env<'_>,
    unit: &UnitView,
    ability: &AbilityRef,
    target: Target,
) -> Result<(), Failure> {
    // Gameplay checks against the actual pool, distinct from the validator's ceiling.
    if unit.resource < ability.cost {
        return Err(Failure::Cancel(CancelReason::InsufficientResources));
    }
    if env.units.is_on_cooldown(unit.id, ability.id) {
        return Err(Failure::Cancel(CancelReason::OnCooldown));
    }
    if ability.requires_overload && !unit.overload {
        return Err(Failure::Cancel(CancelReason::OverloadRequired));
    }

    let (target_position, target_unit) = match target {
        Target::SelfTarget => (unit.position, Some(unit.id)),
        Target::Ground(position) => (position, None),
        Target::Unit(id) => {
            let position = env
                .units
                .position(id)
                .ok_or(Failure::Collaborator(CollaboratorError::UnitNotFound(id)))?;
            (position, Some(id))
        }
    };

    let request = CastRequest {
        ability: *ability,
        source: unit.id,
        target_position,
        target_unit,
        overload: unit.overload,
    };
    match env.executor.execute(&request, &mut *env.units) {
        Ok(true) => Ok(()),
        Ok(false) => Err(Failure::Rejected),
        Err(error) => Err(Failure::Collaborator(error)),
    }
}

fn finalize(action: &mut Action, outcome: Result<(), CancelReason>) {
    let actor = action.actor;
    let result = match outcome {
        Ok(()) => action.resolve(),
        Err(reason) => {
            debug!(
                target: "core::resolution",
                actor = %actor,
                reason = %reason,
                "Action canceled"
            );
            action.cancel(reason)
        }
    };
    if let Err(error) = result {
        warn!(target: "core::resolution", actor = %actor, error = %error, "Finalization refused");
    }
}
