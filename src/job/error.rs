//! Submission errors and their exit codes.

use std::io;
use std::path::PathBuf;

use crate::client::ClientError;

/// Errors raised while preparing or dispatching a job.
///
/// Everything except [`SubmitError::Remote`] is detected before the remote
/// call is made.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Exactly one of a script or a script path must be supplied")]
    AmbiguousInput,

    #[error("Invalid value for '{field}': {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    #[error("Script file does not exist: {}", .0.display())]
    ScriptNotFound(PathBuf),

    #[error("Failed to read script file {}: {source}", .path.display())]
    ScriptRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid job type '{0}'; expected USql or Hive")]
    InvalidJobType(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error(transparent)]
    Remote(#[from] ClientError),
}

/// Failure kind for exit code mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Bad or conflicting input (exit code 2)
    InvalidInput = 2,
    /// Script file missing or unreadable (exit code 3)
    Script = 3,
    /// Client configuration unusable (exit code 4)
    Config = 4,
    /// The service or the transport failed (exit code 20)
    Remote = 20,
}

impl FailureKind {
    pub fn exit_code(self) -> i32 {
        self as i32
    }
}

impl SubmitError {
    /// Map error to failure kind for exit code
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            SubmitError::AmbiguousInput
            | SubmitError::InvalidArgument { .. }
            | SubmitError::InvalidJobType(_)
            | SubmitError::UnsupportedOperation(_) => FailureKind::InvalidInput,
            SubmitError::ScriptNotFound(_) | SubmitError::ScriptRead { .. } => FailureKind::Script,
            SubmitError::Remote(_) => FailureKind::Remote,
        }
    }

    /// Get exit code for this error
    pub fn exit_code(&self) -> i32 {
        self.failure_kind().exit_code()
    }
}
