//! Engine error types
//!
//! Only run-aborting conditions are errors here: bad configuration and input
//! that cannot be read or decoded. Everything that concerns a single control
//! ends up in the validation report.

use ctrlseg_core::CoreError;
use thiserror::Error;

/// Engine-level errors (Application Layer)
#[derive(Error, Debug)]
pub enum EngineError {
    /// Profile or domain configuration error
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Parallel execution error
    #[cfg(feature = "parallel")]
    #[error("parallel execution failed: {0}")]
    ParallelError(String),

    /// Configuration error
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),

    /// Encoding error (UTF-8, etc.)
    #[error("encoding error: {0}")]
    EncodingError(String),

    /// Structured input that does not follow its format
    #[error("invalid input at line {line}: {reason}")]
    InputFormat {
        /// 1-based line number in the input
        line: usize,
        /// What was wrong with it
        reason: String,
    },
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::IoError(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for EngineError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        EngineError::EncodingError(err.to_string())
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
