//! Targeting for ability actions.
//!
//! A target is a tagged union so that illegal combinations (a ground cast that also
//! names a unit, a self cast with a foreign position) cannot be expressed. Which
//! targets an ability accepts is described by [`TargetFlags`].

use bitflags::bitflags;

use crate::state::{Position, UnitId};

bitflags! {
    /// Relations an ability may target.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TargetFlags: u8 {
        /// The acting unit itself.
        const SELF = 1 << 0;
        /// A living unit owned by the same player.
        const ALLY = 1 << 1;
        /// A living unit owned by the opponent.
        const ENEMY = 1 << 2;
        /// Any cell of the grid; no unit required.
        const GROUND = 1 << 3;

        const ANY_UNIT = Self::SELF.bits() | Self::ALLY.bits() | Self::ENEMY.bits();
    }
}

impl TargetFlags {
    /// Returns true if the ability can only be aimed at a cell.
    pub fn is_ground_only(self) -> bool {
        self == TargetFlags::GROUND
    }

    /// Returns true if the ability can be aimed at some unit.
    pub fn targets_units(self) -> bool {
        self.intersects(TargetFlags::ANY_UNIT)
    }
}

/// What an ability action is aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Target {
    /// The acting unit; the target cell is wherever the actor stands.
    SelfTarget,
    /// A grid cell, independent of who stands on it.
    Ground(Position),
    /// A specific unit; the target cell is that unit's authoritative position.
    Unit(UnitId),
}

impl Target {
    /// Unit explicitly named by this target, if any.
    pub fn unit(self) -> Option<UnitId> {
        match self {
            Target::Unit(id) => Some(id),
            Target::SelfTarget | Target::Ground(_) => None,
        }
    }
}

/// Relation of a targeted unit to the acting unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetRelation {
    Itself,
    Ally,
    Enemy,
}

impl TargetRelation {
    pub fn flag(self) -> TargetFlags {
        match self {
            TargetRelation::Itself => TargetFlags::SELF,
            TargetRelation::Ally => TargetFlags::ALLY,
            TargetRelation::Enemy => TargetFlags::ENEMY,
        }
    }
}
