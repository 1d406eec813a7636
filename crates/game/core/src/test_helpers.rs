//! Collaborator doubles shared by the unit tests.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::action::{AbilityId, AbilityRef, PriorityTier, TargetFlags};
use crate::env::{
    AbilityExecutor, Board, CastRequest, CollaboratorError, EndOfTurnTicker, Env, GridProvider,
    StatusFlags, UnitRegistry, UnitView, WinConditionOracle,
};
use crate::state::{PlayerId, Position, UnitId};

#[derive(Debug, Default)]
pub struct TestGrid {
    pub width: i32,
    pub height: i32,
    pub cells: HashMap<Position, UnitId>,
}

impl TestGrid {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            cells: HashMap::new(),
        }
    }
}

impl GridProvider for TestGrid {
    fn dimensions(&self) -> (u32, u32) {
        (self.width as u32, self.height as u32)
    }

    fn is_in_bounds(&self, position: Position) -> bool {
        (0..self.width).contains(&position.x) && (0..self.height).contains(&position.z)
    }

    fn is_occupied(&self, position: Position) -> bool {
        self.cells.contains_key(&position)
    }

    fn occupy(&mut self, position: Position, unit: UnitId) -> Result<(), CollaboratorError> {
        if !self.is_in_bounds(position) {
            return Err(CollaboratorError::OutOfBounds(position));
        }
        if self.cells.insert(position, unit).is_some() {
            return Err(CollaboratorError::CellOccupied(position));
        }
        Ok(())
    }

    fn vacate(&mut self, position: Position) -> Result<(), CollaboratorError> {
        self.cells.remove(&position);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct TestUnits {
    pub units: BTreeMap<UnitId, UnitView>,
    pub cooldowns: HashSet<(UnitId, AbilityId)>,
}

impl TestUnits {
    pub fn get_mut(&mut self, id: UnitId) -> &mut UnitView {
        self.units.get_mut(&id).expect("unit registered in test")
    }
}

impl UnitRegistry for TestUnits {
    fn unit(&self, id: UnitId) -> Option<UnitView> {
        self.units.get(&id).copied()
    }

    fn unit_ids(&self) -> Vec<UnitId> {
        self.units.keys().copied().collect()
    }

    fn is_on_cooldown(&self, id: UnitId, ability: AbilityId) -> bool {
        self.cooldowns.contains(&(id, ability))
    }

    fn set_position(&mut self, id: UnitId, position: Position) -> Result<(), CollaboratorError> {
        let unit = self
            .units
            .get_mut(&id)
            .ok_or(CollaboratorError::UnitNotFound(id))?;
        unit.position = position;
        Ok(())
    }

    fn spend_resource(&mut self, id: UnitId, amount: u32) -> Result<(), CollaboratorError> {
        let unit = self
            .units
            .get_mut(&id)
            .ok_or(CollaboratorError::UnitNotFound(id))?;
        unit.resource = unit.resource.saturating_sub(amount);
        Ok(())
    }

    fn restore_resource(&mut self, id: UnitId, amount: u32) -> Result<(), CollaboratorError> {
        let unit = self
            .units
            .get_mut(&id)
            .ok_or(CollaboratorError::UnitNotFound(id))?;
        unit.resource = (unit.resource + amount).min(100);
        Ok(())
    }

    fn start_cooldown(
        &mut self,
        id: UnitId,
        ability: AbilityId,
        turns: u32,
    ) -> Result<(), CollaboratorError> {
        if turns > 0 {
            self.cooldowns.insert((id, ability));
        }
        Ok(())
    }

    fn decay_cooldowns(&mut self, id: UnitId) -> Result<(), CollaboratorError> {
        self.cooldowns.retain(|(unit, _)| *unit != id);
        Ok(())
    }

    fn tick_statuses(&mut self, id: UnitId) -> Result<(), CollaboratorError> {
        let unit = self
            .units
            .get_mut(&id)
            .ok_or(CollaboratorError::UnitNotFound(id))?;
        unit.status = StatusFlags::empty();
        Ok(())
    }

    fn apply_damage(&mut self, id: UnitId, amount: u32) -> Result<bool, CollaboratorError> {
        let unit = self
            .units
            .get_mut(&id)
            .ok_or(CollaboratorError::UnitNotFound(id))?;
        unit.health = unit.health.saturating_sub(amount);
        if unit.health == 0 {
            unit.alive = false;
        }
        Ok(!unit.alive)
    }
}

/// How the executor reacts to a cast from a given unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastBehavior {
    /// Apply: spend the cost and kill the targeted unit.
    Lethal,
    /// Apply: spend the cost only.
    Harmless,
    Fail,
    Error,
    Panic,
}

#[derive(Debug, Default)]
pub struct RecordingExecutor {
    pub casts: Vec<CastRequest>,
    pub behavior: HashMap<UnitId, CastBehavior>,
}

impl AbilityExecutor for RecordingExecutor {
    fn execute(
        &mut self,
        request: &CastRequest,
        units: &mut dyn UnitRegistry,
    ) -> Result<bool, CollaboratorError> {
        self.casts.push(*request);
        let behavior = self
            .behavior
            .get(&request.source)
            .copied()
            .unwrap_or(CastBehavior::Harmless);
        match behavior {
            CastBehavior::Fail => return Ok(false),
            CastBehavior::Error => return Err(CollaboratorError::Fault("boom".into())),
            CastBehavior::Panic => panic!("executor exploded"),
            CastBehavior::Lethal | CastBehavior::Harmless => {}
        }
        if request.ability.cost > 0 {
            units.spend_resource(request.source, request.ability.cost)?;
        }
        if let (CastBehavior::Lethal, Some(target)) = (behavior, request.target_unit) {
            units.apply_damage(target, u32::MAX)?;
        }
        Ok(true)
    }
}

#[derive(Debug, Default)]
pub struct RecordingTicker {
    pub ticked: Vec<UnitId>,
}

impl EndOfTurnTicker for RecordingTicker {
    fn tick_end_of_turn(
        &mut self,
        unit: UnitId,
        _units: &mut dyn UnitRegistry,
    ) -> Result<(), CollaboratorError> {
        self.ticked.push(unit);
        Ok(())
    }
}

/// Game over once a side has no living units.
#[derive(Debug, Default)]
pub struct LastStanding;

impl LastStanding {
    fn living(units: &dyn UnitRegistry, player: PlayerId) -> usize {
        units
            .living_units()
            .into_iter()
            .filter(|&id| units.owner_of(id) == Some(player))
            .count()
    }
}

impl WinConditionOracle for LastStanding {
    fn is_game_over(&self, units: &dyn UnitRegistry) -> bool {
        PlayerId::ALL
            .iter()
            .any(|&player| Self::living(units, player) == 0)
    }

    fn winner(&self, units: &dyn UnitRegistry) -> Option<PlayerId> {
        let one = Self::living(units, PlayerId::One);
        let two = Self::living(units, PlayerId::Two);
        match (one, two) {
            (0, 0) => None,
            (_, 0) => Some(PlayerId::One),
            (0, _) => Some(PlayerId::Two),
            _ => None,
        }
    }
}

/// A 10x10 board with collaborator doubles.
#[derive(Debug)]
pub struct Fixture {
    pub grid: TestGrid,
    pub units: TestUnits,
    pub executor: RecordingExecutor,
    pub ticker: RecordingTicker,
    pub oracle: LastStanding,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            grid: TestGrid::new(10, 10),
            units: TestUnits::default(),
            executor: RecordingExecutor::default(),
            ticker: RecordingTicker::default(),
            oracle: LastStanding,
        }
    }

    /// Registers a living unit and places it on the grid.
    pub fn spawn(&mut self, id: u32, owner: PlayerId, position: Position, speed: u32) -> UnitId {
        let id = UnitId(id);
        self.units.units.insert(
            id,
            UnitView {
                id,
                owner,
                position,
                speed,
                alive: true,
                health: 20,
                resource: 50,
                overload: false,
                status: StatusFlags::empty(),
            },
        );
        self.grid
            .occupy(position, id)
            .expect("spawn cell free in test");
        id
    }

    pub fn kill(&mut self, id: UnitId) {
        self.units.get_mut(id).alive = false;
    }

    pub fn env(&mut self) -> Env<'_> {
        Env::new(
            &mut self.grid,
            &mut self.units,
            &mut self.executor,
            &mut self.ticker,
            &self.oracle,
        )
    }

    pub fn board(&self) -> Board<'_> {
        Board::new(&self.grid, &self.units)
    }
}

pub fn strike() -> AbilityRef {
    AbilityRef::new(AbilityId(1), PriorityTier::Offensive, TargetFlags::ENEMY).with_range(3)
}

pub fn ward() -> AbilityRef {
    AbilityRef::new(
        AbilityId(2),
        PriorityTier::DefensiveUtility,
        TargetFlags::SELF | TargetFlags::ALLY,
    )
    .with_range(2)
}

pub fn firestorm() -> AbilityRef {
    AbilityRef::new(AbilityId(3), PriorityTier::Offensive, TargetFlags::GROUND)
        .with_range(4)
        .with_cost(10)
}
