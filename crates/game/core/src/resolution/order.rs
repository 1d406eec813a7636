//! Deterministic execution order.

use std::cmp::Reverse;

use crate::action::Action;
use crate::env::UnitRegistry;

/// Returns the indices of `actions` in execution order.
///
/// The key is ascending priority tier, then descending actor speed, then
/// ascending actor id. Two actions never share an actor, so the order is total
/// and independent of the order the actions were submitted in. A unit the
/// registry no longer knows sorts with speed zero.
pub fn resolution_order(actions: &[Action], units: &dyn UnitRegistry) -> Vec<usize> {
    let mut order: Vec<usize> = (0..actions.len()).collect();
    order.sort_by_key(|&index| {
        let action = &actions[index];
        (
            action.priority_tier(),
            Reverse(units.speed(action.actor).unwrap_or(0)),
            action.actor,
        )
    });
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{PriorityTier, Target};
    use crate::state::{PlayerId, Position, UnitId};
    use crate::test_helpers::{Fixture, strike, ward};

    fn actors(actions: &[Action], order: &[usize]) -> Vec<UnitId> {
        order.iter().map(|&index| actions[index].actor).collect()
    }

    #[test]
    fn lower_tier_beats_higher_speed() {
        let mut fixture = Fixture::new();
        let slow = fixture.spawn(1, PlayerId::One, Position::new(1, 1), 5);
        let fast = fixture.spawn(2, PlayerId::Two, Position::new(3, 1), 8);

        let actions = vec![
            Action::use_ability(fast, strike(), Target::Unit(slow)),
            Action::move_to(slow, Position::new(1, 2)),
        ];
        let order = resolution_order(&actions, &fixture.units);
        assert_eq!(actors(&actions, &order), vec![slow, fast]);
    }

    #[test]
    fn every_tier_precedes_the_next() {
        let mut fixture = Fixture::new();
        let units: Vec<UnitId> = (1..=4)
            .map(|id| fixture.spawn(id, PlayerId::One, Position::new(id as i32, 0), 10 - id))
            .collect();
        let tiers = [
            PriorityTier::Offensive,
            PriorityTier::Movement,
            PriorityTier::DefensiveUtility,
            PriorityTier::Reactive,
        ];

        let actions: Vec<Action> = units
            .iter()
            .zip(tiers)
            .map(|(&unit, tier)| {
                let mut ability = strike();
                ability.tier = tier;
                Action::use_ability(unit, ability, Target::SelfTarget)
            })
            .collect();

        let order = resolution_order(&actions, &fixture.units);
        let resolved_tiers: Vec<PriorityTier> =
            order.iter().map(|&i| actions[i].priority_tier()).collect();
        assert_eq!(
            resolved_tiers,
            vec![
                PriorityTier::Reactive,
                PriorityTier::DefensiveUtility,
                PriorityTier::Movement,
                PriorityTier::Offensive,
            ]
        );
    }

    #[test]
    fn faster_unit_wins_within_a_tier() {
        let mut fixture = Fixture::new();
        let slow = fixture.spawn(1, PlayerId::One, Position::new(1, 1), 4);
        let fast = fixture.spawn(2, PlayerId::Two, Position::new(2, 1), 9);

        let actions = vec![
            Action::use_ability(slow, ward(), Target::SelfTarget),
            Action::use_ability(fast, ward(), Target::SelfTarget),
        ];
        let order = resolution_order(&actions, &fixture.units);
        assert_eq!(actors(&actions, &order), vec![fast, slow]);
    }

    #[test]
    fn equal_speed_falls_back_to_lower_id() {
        let mut fixture = Fixture::new();
        let three = fixture.spawn(3, PlayerId::One, Position::new(1, 1), 10);
        let seven = fixture.spawn(7, PlayerId::Two, Position::new(2, 1), 10);

        let submitted = vec![
            Action::use_ability(seven, strike(), Target::Unit(three)),
            Action::use_ability(three, strike(), Target::Unit(seven)),
        ];
        let order = resolution_order(&submitted, &fixture.units);
        assert_eq!(actors(&submitted, &order), vec![three, seven]);

        // Submission order does not matter.
        let reversed: Vec<Action> = submitted.into_iter().rev().collect();
        let order = resolution_order(&reversed, &fixture.units);
        assert_eq!(actors(&reversed, &order), vec![three, seven]);
    }
}
