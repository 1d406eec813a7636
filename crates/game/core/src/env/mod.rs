//! Collaborator interfaces consumed by the core.
//!
//! Grid geometry, the unit registry, ability effects, end-of-turn ticking and
//! the win condition are all owned elsewhere. The [`Env`] bundle injects them
//! per command so the engine never reaches for ambient global state.
mod error;
mod executor;
mod grid;
mod ticker;
mod units;

pub use error::CollaboratorError;
pub use executor::{AbilityExecutor, CastRequest};
pub use grid::GridProvider;
pub use ticker::{EndOfTurnTicker, WinConditionOracle};
pub use units::{StatusFlags, UnitRegistry, UnitView};

/// Aggregates the collaborators required by the validator, the resolution
/// engine and the turn controller.
///
/// Fields are public so callers can split-borrow them (e.g. the grid and the
/// unit registry at once).
pub struct Env<'a> {
    pub grid: &'a mut dyn GridProvider,
    pub units: &'a mut dyn UnitRegistry,
    pub executor: &'a mut dyn AbilityExecutor,
    pub ticker: &'a mut dyn EndOfTurnTicker,
    pub oracle: &'a dyn WinConditionOracle,
}

impl<'a> Env<'a> {
    pub fn new(
        grid: &'a mut dyn GridProvider,
        units: &'a mut dyn UnitRegistry,
        executor: &'a mut dyn AbilityExecutor,
        ticker: &'a mut dyn EndOfTurnTicker,
        oracle: &'a dyn WinConditionOracle,
    ) -> Self {
        Self {
            grid,
            units,
            executor,
            ticker,
            oracle,
        }
    }

    /// Shortens the borrow so the bundle can be handed to a callee and reused.
    pub fn reborrow(&mut self) -> Env<'_> {
        Env {
            grid: &mut *self.grid,
            units: &mut *self.units,
            executor: &mut *self.executor,
            ticker: &mut *self.ticker,
            oracle: self.oracle,
        }
    }

    /// Read-only view for the validator.
    pub fn board(&self) -> Board<'_> {
        Board {
            grid: &*self.grid,
            units: &*self.units,
        }
    }
}

/// Read-only pair of grid and unit registry: everything legality depends on.
#[derive(Clone, Copy)]
pub struct Board<'a> {
    pub grid: &'a dyn GridProvider,
    pub units: &'a dyn UnitRegistry,
}

impl<'a> Board<'a> {
    pub fn new(grid: &'a dyn GridProvider, units: &'a dyn UnitRegistry) -> Self {
        Self { grid, units }
    }
}
