//! Scripted players for the demonstration match.

use tactics_core::{
    AbilityId, AbilityRef, Action, PlayerId, Position, PriorityTier, Target, TargetFlags, UnitId,
    UnitView,
};

pub const STRIKE: AbilityId = AbilityId(1);
pub const BRACE: AbilityId = AbilityId(2);

pub fn strike() -> AbilityRef {
    AbilityRef::new(STRIKE, PriorityTier::Offensive, TargetFlags::ENEMY)
        .with_range(3)
        .with_cost(10)
}

pub fn brace() -> AbilityRef {
    AbilityRef::new(BRACE, PriorityTier::DefensiveUtility, TargetFlags::SELF)
}

/// Greedy bot: strike the weakest enemy in reach, otherwise close the distance.
#[derive(Clone, Copy, Debug)]
pub struct SkirmishBot {
    width: i32,
    height: i32,
}

impl SkirmishBot {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: i32::try_from(width).unwrap_or(i32::MAX),
            height: i32::try_from(height).unwrap_or(i32::MAX),
        }
    }

    /// Picks one action for `player`, or `None` when it has no living unit.
    pub fn choose(&self, player: PlayerId, units: &[UnitView]) -> Option<Action> {
        let own: Vec<&UnitView> = units
            .iter()
            .filter(|unit| unit.alive && unit.owner == player && !unit.is_stunned())
            .collect();
        let enemies: Vec<&UnitView> = units
            .iter()
            .filter(|unit| unit.alive && unit.owner != player)
            .collect();

        let attack = own
            .iter()
            .filter(|unit| !unit.is_silenced() && unit.resource >= strike().cost)
            .flat_map(|unit| {
                enemies
                    .iter()
                    .filter(move |enemy| unit.position.manhattan_distance(enemy.position) <= strike().range)
                    .map(move |enemy| (*unit, *enemy))
            })
            .min_by_key(|(unit, enemy)| (enemy.health, enemy.id, unit.id));
        if let Some((unit, enemy)) = attack {
            return Some(Action::use_ability(unit.id, strike(), Target::Unit(enemy.id)));
        }

        let unit = own.first()?;
        let Some(enemy) = enemies
            .iter()
            .min_by_key(|enemy| (unit.position.manhattan_distance(enemy.position), enemy.id))
        else {
            return Some(Action::use_ability(unit.id, brace(), Target::SelfTarget));
        };

        match self.step_toward(unit.position, enemy.position, units) {
            Some(step) => Some(Action::move_to(unit.id, step)),
            None => Some(Action::use_ability(unit.id, brace(), Target::SelfTarget)),
        }
    }

    fn step_toward(&self, from: Position, to: Position, units: &[UnitView]) -> Option<Position> {
        let blocked = |cell: Position| units.iter().any(|unit| unit.alive && unit.position == cell);
        let in_bounds =
            |cell: Position| (0..self.width).contains(&cell.x) && (0..self.height).contains(&cell.z);

        [(1, 0), (-1, 0), (0, 1), (0, -1)]
            .into_iter()
            .map(|(dx, dz)| Position::new(from.x + dx, from.z + dz))
            .filter(|&cell| in_bounds(cell) && !blocked(cell))
            .filter(|&cell| cell.manhattan_distance(to) < from.manhattan_distance(to))
            .min_by_key(|&cell| (cell.manhattan_distance(to), cell))
    }
}

/// Starting line-up: two units per side on opposite edges of the board.
pub fn line_up(width: u32, height: u32) -> Vec<(UnitId, PlayerId, Position, u32)> {
    let far_x = i32::try_from(width).unwrap_or(i32::MAX).saturating_sub(1);
    let low = i32::try_from(height / 3).unwrap_or(0);
    let high = i32::try_from(height.saturating_sub(1) - height / 3).unwrap_or(0);
    vec![
        (UnitId(1), PlayerId::One, Position::new(0, low), 12),
        (UnitId(2), PlayerId::One, Position::new(0, high), 8),
        (UnitId(3), PlayerId::Two, Position::new(far_x, low), 10),
        (UnitId(4), PlayerId::Two, Position::new(far_x, high), 9),
    ]
}

#[cfg(test)]
mod tests {
    use tactics_core::StatusFlags;

    use super::*;

    fn view(id: u32, owner: PlayerId, x: i32, z: i32, health: u32) -> UnitView {
        UnitView {
            id: UnitId(id),
            owner,
            position: Position::new(x, z),
            speed: 10,
            alive: health > 0,
            health,
            resource: 50,
            overload: false,
            status: StatusFlags::empty(),
        }
    }

    #[test]
    fn strikes_the_weakest_enemy_in_reach() {
        let bot = SkirmishBot::new(8, 8);
        let units = [
            view(1, PlayerId::One, 2, 2, 30),
            view(3, PlayerId::Two, 4, 2, 20),
            view(4, PlayerId::Two, 2, 4, 6),
        ];

        let action = bot.choose(PlayerId::One, &units).expect("action");
        assert_eq!(action.actor, UnitId(1));
        assert_eq!(
            action.kind,
            tactics_core::ActionKind::UseAbility {
                ability: strike(),
                target: Target::Unit(UnitId(4)),
            }
        );
    }

    #[test]
    fn steps_toward_the_nearest_enemy_around_blockers() {
        let bot = SkirmishBot::new(8, 8);
        let units = [
            view(1, PlayerId::One, 0, 2, 30),
            view(2, PlayerId::One, 1, 2, 30),
            view(3, PlayerId::Two, 7, 3, 30),
        ];

        let action = bot.choose(PlayerId::One, &units).expect("action");
        assert_eq!(action.actor, UnitId(1));
        assert_eq!(
            action.kind,
            tactics_core::ActionKind::Move {
                destination: Position::new(0, 3),
                path: None,
            }
        );
    }

    #[test]
    fn defeated_side_has_nothing_to_do() {
        let bot = SkirmishBot::new(8, 8);
        let units = [view(1, PlayerId::One, 0, 0, 0), view(3, PlayerId::Two, 7, 7, 30)];
        assert!(bot.choose(PlayerId::One, &units).is_none());
    }

    #[test]
    fn line_up_fits_the_board() {
        let cells: Vec<_> = line_up(8, 8).into_iter().map(|(_, _, cell, _)| cell).collect();
        assert_eq!(
            cells,
            vec![
                Position::new(0, 2),
                Position::new(0, 5),
                Position::new(7, 2),
                Position::new(7, 5),
            ]
        );
    }
}
