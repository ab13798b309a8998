//! Error types for the recast-core library.
//!
//! Every fallible operation in the crate returns [`CoreResult`]. The variants
//! are grouped by where the failure originates so that front ends can decide
//! how to present them (bad user input versus a failing external tool).

use std::io;

use thiserror::Error;

/// Custom error types for recast-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---- Input problems ----
    #[error("Input file not found: {0}")]
    InputNotFound(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error(
        "'{0}' points to a streaming platform; direct URLs must link to a media file"
    )]
    StreamingPlatformUrl(String),

    #[error("Platform sources are disabled; enable them to fetch from streaming platforms")]
    PlatformSourcesDisabled,

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    // ---- Network ----
    #[error("Download failed: {0}")]
    Download(String),

    // ---- External tools ----
    #[error("Required dependency '{0}' not found")]
    DependencyNotFound(String),

    #[error("Failed to start '{0}': {1}")]
    CommandStart(String, io::Error),

    #[error("Failed waiting for '{0}': {1}")]
    CommandWait(String, io::Error),

    #[error("External tool error: {0}")]
    ExternalTool(String),

    #[error("Encoding failed. Check the input file and the chosen parameters.\n{log_tail}")]
    EncoderFailed { log_tail: String },

    #[error("{0}")]
    OperationFailed(String),
}

impl CoreError {
    /// True when the error was caused by what the user supplied rather than by
    /// the environment or an external tool.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InputNotFound(_)
                | Self::InvalidUrl(_)
                | Self::StreamingPlatformUrl(_)
                | Self::PlatformSourcesDisabled
                | Self::InvalidOption(_)
        )
    }
}

/// Result type for recast-core operations
pub type CoreResult<T> = Result<T, CoreError>;

pub fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

pub fn command_wait_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}
