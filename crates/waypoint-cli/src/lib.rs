//! Waypoint CLI library.
//!
//! Configuration loading, command execution, persistence of collected data
//! and output formatting for the `waypoint` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod persist;

pub use cli::{Cli, Command};
pub use config::{Config, OutputFormat};
pub use error::{CliError, Result};
pub use output::Formatter;
pub use persist::CollectionOutput;
