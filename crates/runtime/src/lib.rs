//! Runtime orchestration for simultaneous-turn tactical matches.
//!
//! This crate hosts one match on a single worker task: it owns the
//! [`tactics_core::MatchState`] and the in-memory arena, drives the selection
//! timer, and fans notifications out through a topic-based event bus. Consumers
//! embed [`Runtime`] and interact with the match through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, builder and configuration
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`arena`] provides the in-memory grid, unit table and default rule plug-ins
//! - `workers` keeps the simulation task internal to the crate
pub mod api;
pub mod arena;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle, TurnSnapshot};
pub use arena::{
    AbilityEffect, Arena, CooldownTicker, GridMap, LastSquadStanding, StandardExecutor,
    StatusEffect, UnitRecord, UnitTable,
};
pub use events::{Event, EventBus, SubmissionEvent, Topic};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
