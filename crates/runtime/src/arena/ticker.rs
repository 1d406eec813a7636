//! Reference end-of-turn ticker.

use tactics_core::{CollaboratorError, EndOfTurnTicker, UnitId, UnitRegistry};

/// Decays cooldowns, expires statuses and regenerates a fixed amount of resource.
#[derive(Clone, Copy, Debug)]
pub struct CooldownTicker {
    regeneration: u32,
}

impl CooldownTicker {
    pub const DEFAULT_REGENERATION: u32 = 5;

    pub fn new(regeneration: u32) -> Self {
        Self { regeneration }
    }
}

impl Default for CooldownTicker {
    fn default() -> Self {
        Self::new(Self::DEFAULT_REGENERATION)
    }
}

impl EndOfTurnTicker for CooldownTicker {
    fn tick_end_of_turn(
        &mut self,
        unit: UnitId,
        units: &mut dyn UnitRegistry,
    ) -> Result<(), CollaboratorError> {
        units.decay_cooldowns(unit)?;
        units.tick_statuses(unit)?;
        if self.regeneration > 0 {
            units.restore_resource(unit, self.regeneration)?;
        }
        Ok(())
    }
}
