//! Error types for the shell.

use std::io;

use crate::command::Outcome;

/// Errors produced while interpreting a command.
///
/// Every variant a handler can return is rendered as a message by the
/// dispatch loop; none of them ends the session.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// Fewer arguments than the command requires.
    #[error("{usage}")]
    Usage { usage: String },

    /// The target path does not exist or cannot be accessed.
    #[error("{message}")]
    NotFound { target: String, message: String },

    /// The operation would violate a precondition on an existing target.
    #[error("{message}")]
    Conflict { target: String, message: String },

    #[error("'{name}' is not recognized.")]
    Unrecognized { name: String },

    /// A required environment variable is not set.
    #[error("Cannot find home directory (${var} is not set)")]
    Environment { var: String },

    /// A recognized command whose operation failed.
    #[error("{message}")]
    Failed { message: String },

    #[error("alias '{alias}' is registered twice")]
    DuplicateAlias { alias: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

impl ShellError {
    pub fn not_found(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            target: target.into(),
            message: message.into(),
        }
    }

    pub fn conflict(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conflict {
            target: target.into(),
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Classifies the error for the execution result.
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::Usage { .. } => Outcome::UsageError,
            Self::NotFound { .. } => Outcome::NotFound,
            Self::Conflict { .. } => Outcome::Conflict,
            Self::Unrecognized { .. } => Outcome::Unrecognized,
            Self::Environment { .. } => Outcome::Environment,
            Self::Failed { .. }
            | Self::DuplicateAlias { .. }
            | Self::Io(_)
            | Self::Readline(_) => Outcome::Failed,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ShellError>;
