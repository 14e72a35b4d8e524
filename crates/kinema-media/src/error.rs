//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during media processing.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Executable not found: {tool} (looked at {path})")]
    ExecutableNotFound { tool: String, path: PathBuf },

    #[error("Encode failed: encoder exited with status {exit_code:?}")]
    EncodeFailed {
        exit_code: Option<i32>,
        stderr_tail: Option<String>,
    },

    #[error("Probe failed: {message}")]
    ProbeFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl MediaError {
    /// Create an executable-not-found error.
    pub fn executable_not_found(tool: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::ExecutableNotFound {
            tool: tool.into(),
            path: path.into(),
        }
    }

    /// Create an encode failure error.
    pub fn encode_failed(exit_code: Option<i32>, stderr_tail: Option<String>) -> Self {
        Self::EncodeFailed {
            exit_code,
            stderr_tail,
        }
    }

    /// Create a probe failure error.
    pub fn probe_failed(message: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ProbeFailed {
            message: message.into(),
            stderr,
        }
    }
}
