//! Core error types for gitgud-core.
//!
//! Errors fall into two camps: validation errors that are surfaced to the
//! caller with the offending key and constraint, and store errors that the
//! engine swallows by degrading to default state.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for gitgud-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// State-store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// State-store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The data directory could not be determined or created
    #[error("Failed to open data directory {path}: {message}")]
    DataDir { path: PathBuf, message: String },

    /// A write to a store key failed
    #[error("Failed to write key '{key}': {source}")]
    WriteFailed {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A delete of a store key failed
    #[error("Failed to delete key '{key}': {source}")]
    DeleteFailed {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration validation errors.
///
/// A `set` with an unknown key or out-of-schema value surfaces one of
/// these synchronously; no mutation is performed.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The key is not part of the configuration schema
    #[error("Unknown setting '{key}' (valid keys: {})", valid_keys.join(", "))]
    UnknownKey {
        key: String,
        valid_keys: Vec<&'static str>,
    },

    /// The value does not satisfy the key's schema
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Persisting the merged configuration failed
    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
