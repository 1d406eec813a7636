//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels, and
//! exposes a builder-based API for hosting one match.

use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use tactics_core::{
    AbilityExecutor, Clock, EndOfTurnTicker, GameConfig, MatchState, WinConditionOracle,
};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::arena::{Arena, CooldownTicker, LastSquadStanding, StandardExecutor};
use crate::events::EventBus;
use crate::workers::{Collaborators, Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub game: GameConfig,
    /// Period of the selection tick; `None` leaves ticking to
    /// [`RuntimeHandle::advance_ticks`].
    #[serde(with = "optional_millis")]
    pub tick_interval: Option<Duration>,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            tick_interval: Some(Duration::from_millis(1_000)),
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TACTICS_TICK_MS` - Selection tick period in ms, 0 disables (default: 1000)
    /// - `TACTICS_SELECTION_TICKS` - Ticks per selection phase (default: 30)
    /// - `TACTICS_MAX_TURNS` - Turn cap (default: 100)
    /// - `TACTICS_MAX_ABILITY_RANGE` - Ability range ceiling (default: 12)
    /// - `TACTICS_MAX_MOVEMENT_RANGE` - Movement ceiling (default: 8)
    /// - `TACTICS_RESOURCE_CEILING` - Resource pool ceiling (default: 100)
    /// - `TACTICS_MAX_SUBMISSIONS` - Submissions per rate window (default: 5)
    /// - `TACTICS_STRICT` - Enforce the submission rate (default: true)
    /// - `TACTICS_EVENT_BUFFER` - Per-topic broadcast capacity (default: 100)
    /// - `TACTICS_COMMAND_BUFFER` - Command queue size (default: 32)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`RuntimeConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(ms) = read_env::<u64>(lookup("TACTICS_TICK_MS")) {
            config.tick_interval = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(ticks) = read_env::<u32>(lookup("TACTICS_SELECTION_TICKS")) {
            config.game.selection_timer_ticks = ticks.max(1);
        }
        if let Some(turns) = read_env::<u32>(lookup("TACTICS_MAX_TURNS")) {
            config.game.max_turns = turns.max(1);
        }

        let validator = &mut config.game.validator;
        if let Some(range) = read_env(lookup("TACTICS_MAX_ABILITY_RANGE")) {
            validator.max_ability_range = range;
        }
        if let Some(range) = read_env(lookup("TACTICS_MAX_MOVEMENT_RANGE")) {
            validator.max_movement_range = range;
        }
        if let Some(ceiling) = read_env(lookup("TACTICS_RESOURCE_CEILING")) {
            validator.max_resource_ceiling = ceiling;
        }
        if let Some(rate) = read_env(lookup("TACTICS_MAX_SUBMISSIONS")) {
            validator.max_submissions_per_window = rate;
        }
        if let Some(strict) = read_env_bool(lookup("TACTICS_STRICT")) {
            validator.strict = strict;
        }

        if let Some(capacity) = read_env::<usize>(lookup("TACTICS_EVENT_BUFFER")) {
            config.event_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>(lookup("TACTICS_COMMAND_BUFFER")) {
            config.command_buffer_size = capacity.max(1);
        }

        config
    }

    /// Load configuration from a JSON document. Missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| RuntimeError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(RuntimeError::ConfigParse)
    }
}

fn read_env<T>(value: Option<String>) -> Option<T>
where
    T: std::str::FromStr,
{
    value?.trim().parse().ok()
}

fn read_env_bool(value: Option<String>) -> Option<bool> {
    match value?.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

mod optional_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(duration) => serializer.serialize_some(&(duration.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?
            .filter(|&ms| ms > 0)
            .map(Duration::from_millis))
    }
}

/// Main runtime hosting one match.
///
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker stops once every clone of the handle has been dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    arena: Option<Arena>,
    executor: Box<dyn AbilityExecutor + Send>,
    ticker: Box<dyn EndOfTurnTicker + Send>,
    oracle: Box<dyn WinConditionOracle + Send>,
    clock: Option<Box<dyn Clock>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            arena: None,
            executor: Box::new(StandardExecutor::new()),
            ticker: Box::new(CooldownTicker::default()),
            oracle: Box::new(LastSquadStanding),
            clock: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required arena (grid and spawned units)
    pub fn arena(mut self, arena: Arena) -> Self {
        self.arena = Some(arena);
        self
    }

    /// Replace the default [`StandardExecutor`]
    pub fn executor(mut self, executor: impl AbilityExecutor + Send + 'static) -> Self {
        self.executor = Box::new(executor);
        self
    }

    /// Replace the default [`CooldownTicker`]
    pub fn ticker(mut self, ticker: impl EndOfTurnTicker + Send + 'static) -> Self {
        self.ticker = Box::new(ticker);
        self
    }

    /// Replace the default [`LastSquadStanding`] win condition
    pub fn oracle(mut self, oracle: impl WinConditionOracle + Send + 'static) -> Self {
        self.oracle = Box::new(oracle);
        self
    }

    /// Time source for submission-rate limiting (wall clock by default)
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Build the runtime and spawn its worker
    pub async fn build(self) -> Result<Runtime> {
        let arena = self.arena.ok_or(RuntimeError::MissingArena)?;

        let state = match self.clock {
            Some(clock) => MatchState::with_clock(self.config.game.clone(), clock),
            None => MatchState::new(self.config.game.clone()),
        };

        let (command_tx, command_rx) =
            mpsc::channel::<Command>(self.config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let sim_worker = SimulationWorker::new(
            state,
            arena,
            Collaborators {
                executor: self.executor,
                ticker: self.ticker,
                oracle: self.oracle,
            },
            command_rx,
            event_bus,
            self.config.tick_interval,
        );

        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            sim_worker_handle,
        })
    }
}
