//! Configuration management for the CLI.
//!
//! The CLI reads the same TOML file as the pipeline. Pipeline sections are
//! handed to [`PipelineConfig`]; the `[output]` table is read here.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use waypoint_pipeline::PipelineConfig;

/// Configuration file used when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "config/waypoint.toml";

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// File the configuration was loaded from
    pub path: PathBuf,

    /// Pipeline configuration
    pub pipeline: PipelineConfig,

    /// Output settings
    pub output: OutputSettings,
}

/// Output settings from the `[output]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Directory for collected data
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Minutes between scheduled runs
    #[serde(default = "default_schedule_interval")]
    pub schedule_interval_minutes: u64,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

#[derive(Debug, Default, Deserialize)]
struct OutputSection {
    #[serde(default)]
    output: OutputSettings,
}

impl Config {
    /// Resolve the configuration file path.
    ///
    /// An explicit path (flag or `WAYPOINT_CONFIG`) wins. Otherwise
    /// `config/waypoint.toml` in the working directory is used, then
    /// `~/.waypoint/config.toml`.
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }

        let local = PathBuf::from(DEFAULT_CONFIG_PATH);
        if local.exists() {
            return Ok(local);
        }

        let home = Self::home_path()?;
        if home.exists() {
            return Ok(home);
        }

        Err(CliError::Config(format!(
            "No configuration file found (tried {} and {})",
            local.display(),
            home.display()
        )))
    }

    /// Per-user configuration file path.
    pub fn home_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".waypoint").join("config.toml"))
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(path, &contents)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(path: &Path, contents: &str) -> Result<Self> {
        let pipeline = PipelineConfig::from_toml(contents)?;
        let section: OutputSection = toml::from_str(contents)?;
        section.output.validate().map_err(CliError::Config)?;

        Ok(Self {
            path: path.to_path_buf(),
            pipeline,
            output: section.output,
        })
    }

    /// Interval between scheduled runs.
    pub fn schedule_interval(&self) -> Duration {
        Duration::from_secs(self.output.schedule_interval_minutes * 60)
    }
}

impl OutputSettings {
    /// Validate the settings.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.schedule_interval_minutes == 0 {
            return Err("schedule_interval_minutes must be at least 1".to_string());
        }
        if self.data_dir.as_os_str().is_empty() {
            return Err("data_dir must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            format: OutputFormat::Table,
            color: true,
            schedule_interval_minutes: default_schedule_interval(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data/processed")
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_true() -> bool {
    true
}

fn default_schedule_interval() -> u64 {
    24 * 60
}
