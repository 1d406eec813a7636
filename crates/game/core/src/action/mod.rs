//! Action domain.
//!
//! An [`Action`] is one player's intent for one unit in one turn. It is created by
//! a submission, finalized exactly once by the resolution engine, and discarded at
//! the end of the turn.
//!
//! # Module Structure
//!
//! - `types`: `Action`, `ActionKind`, `PriorityTier`, resolution lifecycle
//! - `ability`: the ability properties the rules reason about
//! - `targeting`: target union and target flags
//! - `error`: structural and lifecycle errors

pub mod ability;
pub mod error;
pub mod targeting;
pub mod types;

pub use ability::{AbilityId, AbilityRef};
pub use error::ActionError;
pub use targeting::{Target, TargetFlags, TargetRelation};
pub use types::{Action, ActionKind, CancelReason, PriorityTier, ResolutionState};
