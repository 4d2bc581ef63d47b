//! Error types for the mousepass core

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can escape the core
///
/// Most failure modes of the lock screen are non-fatal and never
/// show up here: a missing credential is "not enrolled", a corrupt one is a
/// shorter gesture, an empty candidate scores zero.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed or written
    #[error("Configuration error: {0}")]
    Config(String),

    /// No platform config directory could be determined
    #[error("Could not determine config directory")]
    NoConfigDir,

    /// The gesture buffer could not grow
    #[error("Gesture buffer exhausted: {0}")]
    BufferExhausted(String),

    /// The configured keyboard secret hash is not a valid PHC string
    #[error("Invalid keyboard secret hash: {0}")]
    SecretHash(String),

    /// The input layer failed
    #[error("Input error: {0}")]
    Input(String),

    /// The presentation layer failed
    #[error("Render error: {0}")]
    Render(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(e: std::collections::TryReserveError) -> Self {
        Error::BufferExhausted(e.to_string())
    }
}
