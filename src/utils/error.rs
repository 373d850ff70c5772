//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors raised while building or querying utilization step functions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UtilizationError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed sample for metric '{metric}' at location '{location}': zero-width gap at timestamp {timestamp}")]
    MalformedSample {
        metric: String,
        location: String,
        timestamp: i64,
    },

    #[error("Interval source failed for location '{location}': {reason}")]
    UpstreamIteration { location: String, reason: String },
}

/// Failure reported by an interval source while iterating
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct SourceError(pub String);

/// Errors that can occur during interval trace parsing
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read trace: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid trace format: {0}")]
    InvalidFormat(String),
}

/// Errors that can occur while loading an analysis config
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
