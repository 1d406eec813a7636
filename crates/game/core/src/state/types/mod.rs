mod common;
mod turn;

pub use common::{PlayerId, Position, UnitId};
pub use turn::{ActionSlot, TurnPhase, TurnState};
