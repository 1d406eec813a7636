//! Unit registry capability interface.
//!
//! The core never depends on a concrete unit representation. Implementations hand
//! out a [`UnitView`] snapshot; the derived queries are provided on top of it.
//! The mutating methods are the narrow write surface used by the resolution
//! engine (positions) and by the ability executor and end-of-turn ticker.

use bitflags::bitflags;

use crate::action::AbilityId;
use crate::state::{PlayerId, Position, UnitId};

use super::CollaboratorError;

bitflags! {
    /// Status conditions that restrict what a unit may do.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct StatusFlags: u8 {
        /// Cannot act at all.
        const STUNNED = 1 << 0;
        /// Cannot use abilities; may still move.
        const SILENCED = 1 << 1;
    }
}

/// Read-only snapshot of the unit properties the rules need.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitView {
    pub id: UnitId,
    pub owner: PlayerId,
    pub position: Position,
    pub speed: u32,
    pub alive: bool,
    pub health: u32,
    /// Current resource (aura) pool.
    pub resource: u32,
    pub overload: bool,
    pub status: StatusFlags,
}

impl UnitView {
    pub fn is_stunned(&self) -> bool {
        self.status.contains(StatusFlags::STUNNED)
    }

    pub fn is_silenced(&self) -> bool {
        self.status.contains(StatusFlags::SILENCED)
    }
}

pub trait UnitRegistry {
    fn unit(&self, id: UnitId) -> Option<UnitView>;

    /// All registered units, living or dead, in ascending id order.
    fn unit_ids(&self) -> Vec<UnitId>;

    fn is_on_cooldown(&self, id: UnitId, ability: AbilityId) -> bool;

    /// Updates the unit's logical position. Grid occupancy is managed separately.
    fn set_position(&mut self, id: UnitId, position: Position) -> Result<(), CollaboratorError>;

    fn spend_resource(&mut self, id: UnitId, amount: u32) -> Result<(), CollaboratorError>;

    /// Refills the pool by `amount`, capped at the unit's own maximum.
    fn restore_resource(&mut self, id: UnitId, amount: u32) -> Result<(), CollaboratorError>;

    /// Blocks `ability` for the unit's next `turns` turns. Starting a cooldown
    /// during resolution does not count the tick that closes the casting turn.
    fn start_cooldown(
        &mut self,
        id: UnitId,
        ability: AbilityId,
        turns: u32,
    ) -> Result<(), CollaboratorError>;

    /// Advances every cooldown of the unit by one turn.
    fn decay_cooldowns(&mut self, id: UnitId) -> Result<(), CollaboratorError>;

    /// Advances status durations by one turn, dropping expired ones.
    fn tick_statuses(&mut self, id: UnitId) -> Result<(), CollaboratorError>;

    /// Removes health; returns true if the unit died from it.
    fn apply_damage(&mut self, id: UnitId, amount: u32) -> Result<bool, CollaboratorError>;

    fn speed(&self, id: UnitId) -> Option<u32> {
        self.unit(id).map(|unit| unit.speed)
    }

    fn is_alive(&self, id: UnitId) -> bool {
        self.unit(id).is_some_and(|unit| unit.alive)
    }

    fn owner_of(&self, id: UnitId) -> Option<PlayerId> {
        self.unit(id).map(|unit| unit.owner)
    }

    fn current_resource(&self, id: UnitId) -> Option<u32> {
        self.unit(id).map(|unit| unit.resource)
    }

    fn is_in_overload(&self, id: UnitId) -> bool {
        self.unit(id).is_some_and(|unit| unit.overload)
    }

    fn position(&self, id: UnitId) -> Option<Position> {
        self.unit(id).map(|unit| unit.position)
    }

    fn living_units(&self) -> Vec<UnitId> {
        self.unit_ids()
            .into_iter()
            .filter(|&id| self.is_alive(id))
            .collect()
    }
}
