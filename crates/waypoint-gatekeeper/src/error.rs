//! Gatekeeper error types

use thiserror::Error;

/// Errors that can occur while setting up the gatekeeper
///
/// Per-record and per-fact rejections are not errors; they are reported as
/// data by the validator and the gate.
#[derive(Error, Debug)]
pub enum GatekeeperError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
