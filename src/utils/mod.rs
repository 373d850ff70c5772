//! Utility modules for configuration, error handling, and analysis settings.

pub mod config;
pub mod error;
pub mod settings;

// Re-export commonly used error types for convenience
pub use error::{ConfigError, OutputError, ParseError, SourceError, UtilizationError};
pub use settings::{load_analysis_config, AnalysisConfig};
