//! Unified error types surfaced by the runtime API.
//!
//! Wraps worker coordination, configuration and rule-engine failures so clients
//! can bubble them up with consistent context. Submission rejections are not
//! runtime errors; they travel back as [`tactics_core::SubmitError`].
use std::path::PathBuf;

use thiserror::Error;
use tokio::sync::oneshot;

use tactics_core::{CollaboratorError, ErrorSeverity, GameError, TurnError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires an arena to be configured before building")]
    MissingArena,

    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error(transparent)]
    Arena(#[from] CollaboratorError),

    #[error("failed to read runtime config {path}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse runtime config")]
    ConfigParse(#[source] serde_json::Error),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Turn(error) => error.severity(),
            Self::Arena(error) => error.severity(),
            Self::MissingArena | Self::ConfigIo { .. } | Self::ConfigParse(_) => {
                ErrorSeverity::Validation
            }
            Self::CommandChannelClosed | Self::ReplyChannelClosed(_) | Self::WorkerJoin(_) => {
                ErrorSeverity::Fatal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            Self::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            Self::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            Self::MissingArena => "RUNTIME_MISSING_ARENA",
            Self::Turn(error) => error.error_code(),
            Self::Arena(error) => error.error_code(),
            Self::ConfigIo { .. } => "RUNTIME_CONFIG_IO",
            Self::ConfigParse(_) => "RUNTIME_CONFIG_PARSE",
        }
    }
}
