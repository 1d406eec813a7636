//! Authoritative legality checks.
//!
//! The validator re-derives every legality claim from the [`Board`] instead of
//! trusting the submitting side. Apart from the per-player submission history it
//! holds no state, so the same checks serve client-side previews and the
//! server-side gate.

use std::time::Instant;

use tracing::debug;

use crate::action::{AbilityRef, Action, ActionKind, Target, TargetFlags, TargetRelation};
use crate::config::ValidatorConfig;
use crate::env::{Board, UnitView};
use crate::state::{PlayerId, Position, UnitId};

use super::{Clock, SubmissionHistory, SystemClock, ValidationError, ValidationResult};

#[derive(Debug)]
pub struct Validator {
    config: ValidatorConfig,
    history: [SubmissionHistory; 2],
    clock: Box<dyn Clock>,
}

impl Validator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock))
    }

    pub fn with_clock(config: ValidatorConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            config,
            history: Default::default(),
            clock,
        }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Adjusts the thresholds. `strict = false` disables the submission-rate check.
    pub fn configure(
        &mut self,
        max_ability_range: u32,
        max_movement_range: u32,
        max_submission_rate: usize,
        strict: bool,
    ) {
        self.config.max_ability_range = max_ability_range;
        self.config.max_movement_range = max_movement_range;
        self.config.max_submissions_per_window = max_submission_rate;
        self.config.strict = strict;
    }

    /// Forgets every recorded submission for both players.
    pub fn reset_submission_tracking(&mut self) {
        for history in &mut self.history {
            history.clear();
        }
    }

    /// Records a submission for `player` and reports whether the player is still
    /// inside the allowed rate.
    pub fn validate_submission_rate(&mut self, player: PlayerId) -> bool {
        let now = self.clock.now();
        check_rate(&self.config, &mut self.history[player.index()], now, player).is_ok()
    }

    /// Checks a proposed ability use. Records the attempt in the submission history.
    pub fn validate_ability(
        &mut self,
        board: Board<'_>,
        player: PlayerId,
        ability: &AbilityRef,
        source: UnitId,
        target: Target,
    ) -> ValidationResult {
        let Self {
            config,
            history,
            clock,
        } = self;
        let config = &*config;
        let history = &mut history[player.index()];
        let result = check_ability(config, board, player, ability, source, target, || {
            check_rate(config, history, clock.now(), player)
        });
        log_rejection(source, &result);
        result
    }

    /// Checks a proposed move of `source` to `destination`.
    pub fn validate_movement(
        &self,
        board: Board<'_>,
        source: UnitId,
        destination: Position,
    ) -> ValidationResult {
        let result = check_movement(&self.config, board, source, destination);
        log_rejection(source, &result);
        result
    }

    /// Full admission check for an action submitted by `player`.
    pub fn validate_submission(
        &mut self,
        board: Board<'_>,
        player: PlayerId,
        action: &Action,
    ) -> ValidationResult {
        let Self {
            config,
            history,
            clock,
        } = self;
        let config = &*config;
        let history = &mut history[player.index()];
        let result = check_action(config, board, player, action, || {
            check_rate(config, history, clock.now(), player)
        });
        log_rejection(action.actor, &result);
        result
    }

    /// Resolution-time check: the same legality rules as a submission, without
    /// touching the submission history.
    pub fn revalidate(&self, board: Board<'_>, player: PlayerId, action: &Action) -> ValidationResult {
        check_action(&self.config, board, player, action, || Ok(()))
    }
}

fn log_rejection(unit: UnitId, result: &ValidationResult) {
    if let Err(error) = result {
        debug!(
            target: "core::validator",
            unit = %unit,
            code = %error.code(),
            "Rejected: {error}"
        );
    }
}

fn check_rate(
    config: &ValidatorConfig,
    history: &mut SubmissionHistory,
    now: Instant,
    player: PlayerId,
) -> ValidationResult {
    if !config.strict {
        return Ok(());
    }
    let count = history.record(now, config.submission_window);
    if count > config.max_submissions_per_window {
        return Err(ValidationError::RapidSubmission {
            player,
            count,
            limit: config.max_submissions_per_window,
        });
    }
    Ok(())
}

/// Null guard: the acting unit must exist and be alive.
fn acting_unit(board: Board<'_>, source: UnitId) -> Result<UnitView, ValidationError> {
    match board.units.unit(source) {
        Some(unit) if unit.alive => Ok(unit),
        Some(_) => Err(ValidationError::InvalidInput {
            unit: source,
            reason: "acting unit is dead",
        }),
        None => Err(ValidationError::InvalidInput {
            unit: source,
            reason: "acting unit is unknown",
        }),
    }
}

fn check_ownership(unit: &UnitView, player: PlayerId) -> ValidationResult {
    if unit.owner != player {
        return Err(ValidationError::InvalidOwnership {
            unit: unit.id,
            owner: unit.owner,
            submitter: player,
        });
    }
    Ok(())
}

fn check_action(
    config: &ValidatorConfig,
    board: Board<'_>,
    player: PlayerId,
    action: &Action,
    rate: impl FnOnce() -> ValidationResult,
) -> ValidationResult {
    // Only the resolution engine finalizes an action.
    if !action.resolution().is_pending() {
        return Err(ValidationError::InvalidInput {
            unit: action.actor,
            reason: "action is already finalized",
        });
    }
    match &action.kind {
        ActionKind::UseAbility { ability, target } => {
            check_ability(config, board, player, ability, action.actor, *target, rate)
        }
        ActionKind::Move { destination, path } => {
            let unit = acting_unit(board, action.actor)?;
            check_ownership(&unit, player)?;
            check_movement(config, board, action.actor, *destination)?;

            if let Some(path) = path {
                if action.check_well_formed(unit.position).is_err() {
                    return Err(ValidationError::InvalidInput {
                        unit: action.actor,
                        reason: "malformed movement path",
                    });
                }
                let steps = path.len() as u32;
                if steps > config.max_movement_range {
                    return Err(ValidationError::ImpossibleMovement {
                        distance: steps,
                        limit: config.max_movement_range,
                    });
                }
            }

            rate()
        }
    }
}

fn check_ability(
    config: &ValidatorConfig,
    board: Board<'_>,
    player: PlayerId,
    ability: &AbilityRef,
    source: UnitId,
    target: Target,
    rate: impl FnOnce() -> ValidationResult,
) -> ValidationResult {
    let unit = acting_unit(board, source)?;
    check_ownership(&unit, player)?;

    // Positions come from the registry, never from the client.
    let target_position = match target {
        Target::SelfTarget => Some(unit.position),
        Target::Ground(position) => Some(position),
        Target::Unit(id) => board.units.position(id),
    };

    if let Some(position) = target_position {
        let distance = board.grid.manhattan_distance(unit.position, position);
        let limit = ability
            .range
            .saturating_add(config.range_buffer)
            .max(config.max_ability_range);
        if distance > limit {
            return Err(ValidationError::ImpossibleRange { distance, limit });
        }
    }

    check_targeting(board, &unit, ability, target)?;

    if ability.cost > config.max_resource_ceiling {
        return Err(ValidationError::ImpossibleCost {
            ability: ability.id,
            cost: ability.cost,
            ceiling: config.max_resource_ceiling,
        });
    }

    if ability.requires_overload && !unit.overload {
        return Err(ValidationError::OverloadRequired {
            unit: source,
            ability: ability.id,
        });
    }

    rate()?;

    if let Some(position) = target_position.filter(|&p| !board.grid.is_in_bounds(p)) {
        return Err(ValidationError::OutOfBounds { position });
    }

    Ok(())
}

fn check_targeting(
    board: Board<'_>,
    source: &UnitView,
    ability: &AbilityRef,
    target: Target,
) -> ValidationResult {
    let relation = match target {
        Target::Ground(_) => {
            if !ability.targeting.contains(TargetFlags::GROUND) {
                return Err(ValidationError::InvalidTarget {
                    reason: "ability cannot target the ground",
                });
            }
            return Ok(());
        }
        Target::SelfTarget => TargetRelation::Itself,
        Target::Unit(id) => {
            let Some(target) = board.units.unit(id).filter(|unit| unit.alive) else {
                return Err(ValidationError::InvalidTarget {
                    reason: "target unit is missing or dead",
                });
            };
            if target.id == source.id {
                TargetRelation::Itself
            } else if target.owner == source.owner {
                TargetRelation::Ally
            } else {
                TargetRelation::Enemy
            }
        }
    };

    if !ability.targeting.contains(relation.flag()) {
        return Err(ValidationError::InvalidTarget {
            reason: match relation {
                TargetRelation::Itself => "ability cannot target its user",
                TargetRelation::Ally => "ability cannot target allies",
                TargetRelation::Enemy => "ability cannot target enemies",
            },
        });
    }
    Ok(())
}

fn check_movement(
    config: &ValidatorConfig,
    board: Board<'_>,
    source: UnitId,
    destination: Position,
) -> ValidationResult {
    let unit = acting_unit(board, source)?;

    let distance = board.grid.manhattan_distance(unit.position, destination);
    if distance > config.max_movement_range {
        return Err(ValidationError::ImpossibleMovement {
            distance,
            limit: config.max_movement_range,
        });
    }

    if !board.grid.is_in_bounds(destination) {
        return Err(ValidationError::OutOfBounds {
            position: destination,
        });
    }

    if board.grid.is_occupied(destination) {
        return Err(ValidationError::PositionOccupied {
            position: destination,
        });
    }

    Ok(())
}
