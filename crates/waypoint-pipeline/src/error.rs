//! Error types for the pipeline

use thiserror::Error;
use waypoint_domain::ScoringError;

/// Errors that abort a pipeline run
///
/// Failing sources and rejected records or facts are not errors; they are
/// reported in the [`PipelineReport`](crate::PipelineReport).
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid configuration, detected before any fetch
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal consistency failure while scoring facts
    #[error("Aggregation invariant violated: {0}")]
    Invariant(#[from] ScoringError),

    /// Configuration file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for PipelineError {
    fn from(e: toml::de::Error) -> Self {
        PipelineError::Config(format!("Failed to parse TOML: {}", e))
    }
}
