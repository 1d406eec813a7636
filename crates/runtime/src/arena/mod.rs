//! In-memory collaborators backing a hosted match.
//!
//! The [`Arena`] owns the board geometry and the unit table; [`StandardExecutor`],
//! [`CooldownTicker`] and [`LastSquadStanding`] are the default rule plug-ins
//! the runtime wires into the core.
mod executor;
mod grid;
mod oracle;
mod ticker;
mod units;

pub use executor::{AbilityEffect, StandardExecutor};
pub use grid::GridMap;
pub use oracle::LastSquadStanding;
pub use ticker::CooldownTicker;
pub use units::{StatusEffect, UnitRecord, UnitTable};

use tactics_core::{CollaboratorError, GridProvider, UnitId};

/// Grid plus unit table for one match.
#[derive(Clone, Debug)]
pub struct Arena {
    pub grid: GridMap,
    pub units: UnitTable,
}

impl Arena {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            grid: GridMap::new(width, height),
            units: UnitTable::new(),
        }
    }

    /// Places a unit on the board and registers it.
    pub fn spawn(&mut self, record: UnitRecord) -> Result<UnitId, CollaboratorError> {
        let id = record.id;
        if self.units.get(id).is_some() {
            return Err(CollaboratorError::Fault(format!("{id} is already spawned")));
        }
        if !self.grid.is_in_bounds(record.position) {
            return Err(CollaboratorError::OutOfBounds(record.position));
        }
        self.grid.occupy(record.position, id)?;
        self.units.insert(record);
        Ok(id)
    }

    pub fn with_unit(mut self, record: UnitRecord) -> Result<Self, CollaboratorError> {
        self.spawn(record)?;
        Ok(self)
    }

    /// Frees the cells still held by dead units and returns their ids.
    pub fn clear_fallen(&mut self) -> Vec<UnitId> {
        let fallen: Vec<_> = self
            .units
            .records()
            .filter(|record| !record.is_alive())
            .filter(|record| self.grid.occupant(record.position) == Some(record.id))
            .map(|record| (record.id, record.position))
            .collect();

        fallen
            .into_iter()
            .filter_map(|(id, position)| self.grid.vacate(position).ok().map(|()| id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use tactics_core::{PlayerId, Position, UnitRegistry};

    use super::*;

    #[test]
    fn spawn_occupies_the_cell() {
        let mut arena = Arena::new(4, 4);
        let id = arena
            .spawn(UnitRecord::new(UnitId(1), PlayerId::One, Position::new(1, 1)))
            .unwrap();

        assert_eq!(arena.grid.occupant(Position::new(1, 1)), Some(id));
        assert!(
            arena
                .spawn(UnitRecord::new(UnitId(2), PlayerId::Two, Position::new(1, 1)))
                .is_err()
        );
        assert!(
            arena
                .spawn(UnitRecord::new(UnitId(3), PlayerId::Two, Position::new(9, 0)))
                .is_err()
        );
        assert!(
            arena
                .spawn(UnitRecord::new(UnitId(1), PlayerId::One, Position::new(2, 2)))
                .is_err()
        );
    }

    #[test]
    fn fallen_units_release_their_cell() {
        let mut arena = Arena::new(4, 4)
            .with_unit(UnitRecord::new(UnitId(1), PlayerId::One, Position::new(0, 0)))
            .unwrap()
            .with_unit(UnitRecord::new(UnitId(2), PlayerId::Two, Position::new(3, 3)))
            .unwrap();
        arena.units.apply_damage(UnitId(2), 1_000).unwrap();

        assert_eq!(arena.clear_fallen(), vec![UnitId(2)]);
        assert!(!arena.grid.is_occupied(Position::new(3, 3)));
        assert!(arena.grid.is_occupied(Position::new(0, 0)));
        assert!(arena.clear_fallen().is_empty());
    }
}
