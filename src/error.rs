//! Error types for the nback library.

use thiserror::Error;

/// Top-level error type for fallible nback operations.
///
/// Game actions that are invalid for the current state (answering during
/// warm-up, starting twice) are no-ops rather than errors; this enum only
/// covers values rejected at the configuration boundary, settings I/O and
/// log setup.
#[derive(Error, Debug)]
pub enum NbackError {
    /// A session parameter is outside its allowed range.
    #[error("Invalid configuration: {field} = {value} ({reason})")]
    InvalidConfig {
        /// Which parameter was rejected.
        field: &'static str,
        /// The rejected value.
        value: u64,
        /// What the parameter requires.
        reason: &'static str,
    },

    /// Settings could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A global log subscriber could not be installed.
    #[error("Logging setup failed: {0}")]
    Logging(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, NbackError>;
