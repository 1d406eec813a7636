use crate::action::AbilityRef;
use crate::state::{Position, UnitId};

use super::{CollaboratorError, UnitRegistry};

/// Everything the ability executor needs to apply one cast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CastRequest {
    pub ability: AbilityRef,
    pub source: UnitId,
    pub target_position: Position,
    pub target_unit: Option<UnitId>,
    pub overload: bool,
}

/// Applies ability effects (damage, statuses, resource spend).
///
/// Returns `Ok(true)` when the effect applied, `Ok(false)` when it failed for a
/// gameplay reason. `Err` means the executor itself misbehaved.
pub trait AbilityExecutor {
    fn execute(
        &mut self,
        request: &CastRequest,
        units: &mut dyn UnitRegistry,
    ) -> Result<bool, CollaboratorError>;
}
