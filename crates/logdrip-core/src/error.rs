//! Error types for logdrip-core

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Speed factor that cannot drive a replay
    #[error("Invalid speed factor: {0} (must be positive and finite)")]
    InvalidSpeed(f64),

    /// A generator mode was asked to run without any lines
    #[error("Line source produced no lines")]
    EmptySource,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
