use crate::state::{Position, UnitId};

use super::CollaboratorError;

/// Board geometry and occupancy.
pub trait GridProvider {
    /// Width and height in cells.
    fn dimensions(&self) -> (u32, u32);

    fn is_in_bounds(&self, position: Position) -> bool;

    fn is_occupied(&self, position: Position) -> bool;

    fn manhattan_distance(&self, from: Position, to: Position) -> u32 {
        from.manhattan_distance(to)
    }

    /// Places `unit` on `position`.
    fn occupy(&mut self, position: Position, unit: UnitId) -> Result<(), CollaboratorError>;

    /// Clears whatever stands on `position`.
    fn vacate(&mut self, position: Position) -> Result<(), CollaboratorError>;
}
