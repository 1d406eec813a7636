//! Ability references carried by `UseAbility` actions.
//!
//! Definitions are loaded by an external data layer; the core only needs the
//! handful of properties that govern ordering and legality.

use core::fmt;

use super::targeting::TargetFlags;
use super::types::PriorityTier;

/// Identifier of an ability definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityId(pub u16);

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ability:{}", self.0)
    }
}

/// The subset of an ability definition the rules engine reasons about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityRef {
    pub id: AbilityId,
    pub tier: PriorityTier,
    /// Nominal range in tiles (Manhattan).
    pub range: u32,
    /// Resource cost (aura).
    pub cost: u32,
    pub targeting: TargetFlags,
    /// Ability can only be used while the unit is in Overload.
    pub requires_overload: bool,
    /// Turns the ability stays on cooldown after use.
    pub cooldown_turns: u32,
}

impl AbilityRef {
    pub fn new(id: AbilityId, tier: PriorityTier, targeting: TargetFlags) -> Self {
        Self {
            id,
            tier,
            range: 1,
            cost: 0,
            targeting,
            requires_overload: false,
            cooldown_turns: 0,
        }
    }

    pub fn with_range(mut self, range: u32) -> Self {
        self.range = range;
        self
    }

    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_cooldown(mut self, turns: u32) -> Self {
        self.cooldown_turns = turns;
        self
    }

    pub fn requiring_overload(mut self) -> Self {
        self.requires_overload = true;
        self
    }
}
