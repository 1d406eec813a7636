//! In-memory unit registry.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tactics_core::{
    AbilityId, CollaboratorError, PlayerId, Position, StatusFlags, UnitId, UnitRegistry, UnitView,
};

/// A timed status condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub flags: StatusFlags,
    /// End-of-turn ticks left before the status expires.
    pub remaining: u32,
}

/// Full record of one unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub id: UnitId,
    pub owner: PlayerId,
    pub position: Position,
    pub speed: u32,
    pub health: u32,
    pub max_health: u32,
    pub resource: u32,
    pub max_resource: u32,
    pub overload: bool,
    pub cooldowns: HashMap<AbilityId, u32>,
    pub statuses: Vec<StatusEffect>,
}

impl UnitRecord {
    pub fn new(id: UnitId, owner: PlayerId, position: Position) -> Self {
        Self {
            id,
            owner,
            position,
            speed: 10,
            health: 30,
            max_health: 30,
            resource: 50,
            max_resource: 100,
            overload: false,
            cooldowns: HashMap::new(),
            statuses: Vec::new(),
        }
    }

    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_health(mut self, health: u32) -> Self {
        self.health = health;
        self.max_health = self.max_health.max(health);
        self
    }

    pub fn with_resource(mut self, resource: u32, max_resource: u32) -> Self {
        self.max_resource = max_resource;
        self.resource = resource.min(max_resource);
        self
    }

    pub fn with_overload(mut self, overload: bool) -> Self {
        self.overload = overload;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn status(&self) -> StatusFlags {
        self.statuses
            .iter()
            .fold(StatusFlags::empty(), |acc, effect| acc | effect.flags)
    }

    pub fn view(&self) -> UnitView {
        UnitView {
            id: self.id,
            owner: self.owner,
            position: self.position,
            speed: self.speed,
            alive: self.is_alive(),
            health: self.health,
            resource: self.resource,
            overload: self.overload,
            status: self.status(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct UnitTable {
    records: BTreeMap<UnitId, UnitRecord>,
}

impl UnitTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: UnitRecord) -> Option<UnitRecord> {
        self.records.insert(record.id, record)
    }

    pub fn get(&self, id: UnitId) -> Option<&UnitRecord> {
        self.records.get(&id)
    }

    pub fn records(&self) -> impl Iterator<Item = &UnitRecord> {
        self.records.values()
    }

    pub fn set_overload(&mut self, id: UnitId, overload: bool) -> Result<(), CollaboratorError> {
        self.record_mut(id)?.overload = overload;
        Ok(())
    }

    /// Applies `flags` for `turns` end-of-turn ticks.
    pub fn apply_status(
        &mut self,
        id: UnitId,
        flags: StatusFlags,
        turns: u32,
    ) -> Result<(), CollaboratorError> {
        if turns > 0 {
            self.record_mut(id)?.statuses.push(StatusEffect {
                flags,
                remaining: turns,
            });
        }
        Ok(())
    }

    fn record_mut(&mut self, id: UnitId) -> Result<&mut UnitRecord, CollaboratorError> {
        self.records
            .get_mut(&id)
            .ok_or(CollaboratorError::UnitNotFound(id))
    }
}

impl UnitRegistry for UnitTable {
    fn unit(&self, id: UnitId) -> Option<UnitView> {
        self.records.get(&id).map(UnitRecord::view)
    }

    fn unit_ids(&self) -> Vec<UnitId> {
        self.records.keys().copied().collect()
    }

    fn is_on_cooldown(&self, id: UnitId, ability: AbilityId) -> bool {
        self.records
            .get(&id)
            .and_then(|record| record.cooldowns.get(&ability))
            .is_some_and(|&remaining| remaining > 0)
    }

    fn set_position(&mut self, id: UnitId, position: Position) -> Result<(), CollaboratorError> {
        self.record_mut(id)?.position = position;
        Ok(())
    }

    fn spend_resource(&mut self, id: UnitId, amount: u32) -> Result<(), CollaboratorError> {
        let record = self.record_mut(id)?;
        record.resource = record.resource.checked_sub(amount).ok_or_else(|| {
            CollaboratorError::Fault(format!(
                "{id} cannot spend {amount} from a pool of {}",
                record.resource
            ))
        })?;
        Ok(())
    }

    fn restore_resource(&mut self, id: UnitId, amount: u32) -> Result<(), CollaboratorError> {
        let record = self.record_mut(id)?;
        record.resource = record.resource.saturating_add(amount).min(record.max_resource);
        Ok(())
    }

    fn start_cooldown(
        &mut self,
        id: UnitId,
        ability: AbilityId,
        turns: u32,
    ) -> Result<(), CollaboratorError> {
        let record = self.record_mut(id)?;
        if turns > 0 {
            // One extra tick for the end of the casting turn.
            record.cooldowns.insert(ability, turns.saturating_add(1));
        }
        Ok(())
    }

    fn decay_cooldowns(&mut self, id: UnitId) -> Result<(), CollaboratorError> {
        let record = self.record_mut(id)?;
        record.cooldowns.retain(|_, remaining| {
            *remaining = remaining.saturating_sub(1);
            *remaining > 0
        });
        Ok(())
    }

    fn tick_statuses(&mut self, id: UnitId) -> Result<(), CollaboratorError> {
        let record = self.record_mut(id)?;
        record.statuses.retain_mut(|effect| {
            effect.remaining = effect.remaining.saturating_sub(1);
            effect.remaining > 0
        });
        Ok(())
    }

    fn apply_damage(&mut self, id: UnitId, amount: u32) -> Result<bool, CollaboratorError> {
        let record = self.record_mut(id)?;
        let was_alive = record.is_alive();
        record.health = record.health.saturating_sub(amount);
        Ok(was_alive && !record.is_alive())
    }
}
