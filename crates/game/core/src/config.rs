//! Game configuration constants and tunable parameters.

use std::time::Duration;

/// Thresholds used by the validator's anti-cheat ceiling checks.
///
/// These are deliberately global: they bound what is *possible* in the game, not
/// what a particular unit can currently afford.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ValidatorConfig {
    /// Hard ceiling on ability range, in tiles.
    pub max_ability_range: u32,
    /// Slack added to an ability's own range to absorb range-modifying effects.
    pub range_buffer: u32,
    /// Hard ceiling on a single move, in tiles.
    pub max_movement_range: u32,
    /// Largest resource pool any unit can ever have.
    pub max_resource_ceiling: u32,
    /// Submissions allowed per player inside one sliding window.
    pub max_submissions_per_window: usize,
    /// Length of the sliding submission window.
    #[cfg_attr(feature = "serde", serde(with = "duration_millis"))]
    pub submission_window: Duration,
    /// When false the submission-rate check is skipped.
    pub strict: bool,
}

impl ValidatorConfig {
    pub const DEFAULT_MAX_ABILITY_RANGE: u32 = 12;
    pub const DEFAULT_RANGE_BUFFER: u32 = 2;
    pub const DEFAULT_MAX_MOVEMENT_RANGE: u32 = 8;
    pub const DEFAULT_MAX_RESOURCE_CEILING: u32 = 100;
    pub const DEFAULT_MAX_SUBMISSIONS_PER_WINDOW: usize = 5;
    pub const DEFAULT_SUBMISSION_WINDOW: Duration = Duration::from_secs(1);

    pub fn new() -> Self {
        Self {
            max_ability_range: Self::DEFAULT_MAX_ABILITY_RANGE,
            range_buffer: Self::DEFAULT_RANGE_BUFFER,
            max_movement_range: Self::DEFAULT_MAX_MOVEMENT_RANGE,
            max_resource_ceiling: Self::DEFAULT_MAX_RESOURCE_CEILING,
            max_submissions_per_window: Self::DEFAULT_MAX_SUBMISSIONS_PER_WINDOW,
            submission_window: Self::DEFAULT_SUBMISSION_WINDOW,
            strict: true,
        }
    }

    pub fn with_max_resource_ceiling(mut self, ceiling: u32) -> Self {
        self.max_resource_ceiling = ceiling;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Match-level configuration: validator thresholds plus turn pacing.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub validator: ValidatorConfig,
    /// Ticks granted to the players to lock their actions each turn.
    pub selection_timer_ticks: u32,
    /// Hard safety cap; the game ends after this turn even without a winner.
    pub max_turns: u32,
}

impl GameConfig {
    pub const DEFAULT_SELECTION_TIMER_TICKS: u32 = 30;
    pub const DEFAULT_MAX_TURNS: u32 = 100;

    pub fn new() -> Self {
        Self {
            validator: ValidatorConfig::default(),
            selection_timer_ticks: Self::DEFAULT_SELECTION_TIMER_TICKS,
            max_turns: Self::DEFAULT_MAX_TURNS,
        }
    }

    pub fn with_validator(mut self, validator: ValidatorConfig) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_selection_timer(mut self, ticks: u32) -> Self {
        self.selection_timer_ticks = ticks;
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "serde")]
mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
