//! Common error infrastructure for tactics-core.
//!
//! Domain-specific errors (`ValidationError`, `ActionError`, `TurnError`,
//! `CollaboratorError`) live next to the code that raises them and implement
//! [`GameError`] so callers can classify them uniformly.
//!
//! # Design Principles
//!
//! - **Stable codes**: every variant maps to a machine-readable code that clients and
//!   tests can assert on
//! - **Rich Context**: errors carry the unit, position and turn involved
//! - **Severity Classification**: errors are categorized for recovery strategies

use crate::state::{Position, UnitId};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Can retry with a corrected or alternative action within the same turn.
    ///
    /// Examples: destination occupied, submission rate exceeded
    Recoverable,

    /// Invalid or impossible input that should be rejected without retry.
    ///
    /// Examples: foreign unit, impossible range, impossible cost
    Validation,

    /// Unexpected state inconsistency; indicates a bug in the core or a collaborator.
    Internal,

    /// Unrecoverable; the match cannot continue.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors for debugging and diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ErrorContext {
    pub unit: Option<UnitId>,
    pub position: Option<Position>,
    /// Turn number at the time of the error.
    pub turn: u32,
    pub message: Option<&'static str>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(turn: u32) -> Self {
        Self {
            unit: None,
            position: None,
            turn,
            message: None,
        }
    }

    #[must_use]
    pub const fn with_unit(mut self, unit: UnitId) -> Self {
        self.unit = Some(unit);
        self
    }

    #[must_use]
    pub const fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common trait for all tactics-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - Error codes are part of the client contract and must never be renamed
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Stable machine-readable identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
