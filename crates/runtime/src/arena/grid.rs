//! Bounded occupancy grid.

use std::collections::HashMap;

use tactics_core::{CollaboratorError, GridProvider, Position, UnitId};

/// Rectangular board with cells `(0..width, 0..height)`; at most one unit per cell.
#[derive(Clone, Debug)]
pub struct GridMap {
    width: u32,
    height: u32,
    cells: HashMap<Position, UnitId>,
}

impl GridMap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: HashMap::new(),
        }
    }

    pub fn occupant(&self, position: Position) -> Option<UnitId> {
        self.cells.get(&position).copied()
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }
}

impl GridProvider for GridMap {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn is_in_bounds(&self, position: Position) -> bool {
        u32::try_from(position.x).is_ok_and(|x| x < self.width)
            && u32::try_from(position.z).is_ok_and(|z| z < self.height)
    }

    fn is_occupied(&self, position: Position) -> bool {
        self.cells.contains_key(&position)
    }

    fn occupy(&mut self, position: Position, unit: UnitId) -> Result<(), CollaboratorError> {
        if !self.is_in_bounds(position) {
            return Err(CollaboratorError::OutOfBounds(position));
        }
        if self.cells.contains_key(&position) {
            return Err(CollaboratorError::CellOccupied(position));
        }
        self.cells.insert(position, unit);
        Ok(())
    }

    fn vacate(&mut self, position: Position) -> Result<(), CollaboratorError> {
        self.cells.remove(&position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_half_open() {
        let grid = GridMap::new(8, 6);
        assert!(grid.is_in_bounds(Position::new(0, 0)));
        assert!(grid.is_in_bounds(Position::new(7, 5)));
        assert!(!grid.is_in_bounds(Position::new(8, 5)));
        assert!(!grid.is_in_bounds(Position::new(7, 6)));
        assert!(!grid.is_in_bounds(Position::new(-1, 0)));
    }

    #[test]
    fn occupy_refuses_taken_and_foreign_cells() {
        let mut grid = GridMap::new(4, 4);
        let cell = Position::new(1, 1);

        grid.occupy(cell, UnitId(1)).unwrap();
        assert_eq!(grid.occupant(cell), Some(UnitId(1)));
        assert_eq!(
            grid.occupy(cell, UnitId(2)),
            Err(CollaboratorError::CellOccupied(cell))
        );
        assert_eq!(
            grid.occupy(Position::new(4, 0), UnitId(2)),
            Err(CollaboratorError::OutOfBounds(Position::new(4, 0)))
        );

        grid.vacate(cell).unwrap();
        assert!(!grid.is_occupied(cell));
        assert_eq!(grid.occupied_cells(), 0);
    }
}
