use crate::state::{PlayerId, UnitId};

use super::{CollaboratorError, UnitRegistry};

/// End-of-turn bookkeeping for a single living unit: cooldown decay and status ticks.
pub trait EndOfTurnTicker {
    fn tick_end_of_turn(
        &mut self,
        unit: UnitId,
        units: &mut dyn UnitRegistry,
    ) -> Result<(), CollaboratorError>;
}

/// Decides whether the match is over and who won.
pub trait WinConditionOracle {
    fn is_game_over(&self, units: &dyn UnitRegistry) -> bool;

    /// Winning seat, or `None` for a draw or an unfinished match.
    fn winner(&self, units: &dyn UnitRegistry) -> Option<PlayerId>;
}
