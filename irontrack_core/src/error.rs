//! Error types for the irontrack_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for irontrack_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// User-correctable validation error (e.g. saving an unnamed routine).
    /// Rejected synchronously; the document is left unchanged.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Session engine error (e.g. starting with no active routine)
    #[error("Session error: {0}")]
    Session(String),
}
