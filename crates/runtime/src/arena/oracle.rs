//! Reference win condition.

use tactics_core::{PlayerId, UnitRegistry, WinConditionOracle};

/// The match is over once a side has no living units; the other side wins.
#[derive(Clone, Copy, Debug, Default)]
pub struct LastSquadStanding;

impl LastSquadStanding {
    fn survivors(units: &dyn UnitRegistry, player: PlayerId) -> usize {
        units
            .living_units()
            .into_iter()
            .filter(|&id| units.owner_of(id) == Some(player))
            .count()
    }
}

impl WinConditionOracle for LastSquadStanding {
    fn is_game_over(&self, units: &dyn UnitRegistry) -> bool {
        PlayerId::ALL
            .into_iter()
            .any(|player| Self::survivors(units, player) == 0)
    }

    fn winner(&self, units: &dyn UnitRegistry) -> Option<PlayerId> {
        match PlayerId::ALL.map(|player| Self::survivors(units, player)) {
            [0, 0] => None,
            [_, 0] => Some(PlayerId::One),
            [0, _] => Some(PlayerId::Two),
            _ => None,
        }
    }
}
