//! Reference ability executor.

use std::collections::HashMap;

use tactics_core::{AbilityExecutor, AbilityId, CastRequest, CollaboratorError, UnitRegistry};
use tracing::debug;

/// Effect applied by one ability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AbilityEffect {
    pub damage: u32,
}

impl AbilityEffect {
    pub fn damage(damage: u32) -> Self {
        Self { damage }
    }
}

/// Starts the cooldown, spends the cost and applies the listed damage.
///
/// Ground casts hit whichever living unit stands on the target cell, if any.
#[derive(Clone, Debug, Default)]
pub struct StandardExecutor {
    effects: HashMap<AbilityId, AbilityEffect>,
}

impl StandardExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_effect(mut self, ability: AbilityId, effect: AbilityEffect) -> Self {
        self.effects.insert(ability, effect);
        self
    }
}

impl AbilityExecutor for StandardExecutor {
    fn execute(
        &mut self,
        request: &CastRequest,
        units: &mut dyn UnitRegistry,
    ) -> Result<bool, CollaboratorError> {
        let ability = &request.ability;
        let victim = match request.target_unit {
            Some(target) if !units.is_alive(target) => return Ok(false),
            Some(target) => Some(target),
            None => units
                .living_units()
                .into_iter()
                .find(|&id| units.position(id) == Some(request.target_position)),
        };

        // Refusals leave the caster untouched.
        let Some(pool) = units.current_resource(request.source) else {
            return Err(CollaboratorError::UnitNotFound(request.source));
        };
        if pool < ability.cost {
            return Ok(false);
        }

        units.start_cooldown(request.source, ability.id, ability.cooldown_turns)?;
        if ability.cost > 0 {
            units.spend_resource(request.source, ability.cost)?;
        }

        let effect = self.effects.get(&ability.id).copied().unwrap_or_default();
        if let (Some(victim), true) = (victim, effect.damage > 0) {
            let killed = units.apply_damage(victim, effect.damage)?;
            debug!(
                target: "runtime::arena",
                source = %request.source,
                %victim,
                damage = effect.damage,
                killed,
                "Ability hit"
            );
        }
        Ok(true)
    }
}
