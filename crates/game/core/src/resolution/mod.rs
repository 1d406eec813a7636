//! Deterministic resolution of simultaneously locked actions.
//!
//! [`resolution_order`] is the pure ordering rule; [`ResolutionEngine`] applies
//! it, re-validates each action right before it runs and finalizes every action
//! as Resolved or Canceled.
mod engine;
mod order;

pub use engine::{ResolutionEngine, ResolutionReport};
pub use order::resolution_order;
