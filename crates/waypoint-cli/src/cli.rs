//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use waypoint_domain::SourceCategory;

/// Waypoint - Collect and vet transport-policy data from multiple sources.
#[derive(Debug, Parser)]
#[command(name = "waypoint")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "WAYPOINT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory for collected data
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one collection and save the accepted records
    Collect,

    /// Summarize a previously saved collection
    Analyze(AnalyzeArgs),

    /// Collect on a schedule until interrupted
    Schedule(ScheduleArgs),

    /// List configured sources
    Sources(SourcesArgs),
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// File to analyze (path, or name inside the data directory)
    pub filename: String,
}

/// Arguments for the schedule command.
#[derive(Debug, Parser)]
pub struct ScheduleArgs {
    /// Stop after this many runs
    #[arg(short = 'n', long)]
    pub cycles: Option<usize>,

    /// Minutes between runs (overrides the configuration)
    #[arg(short, long)]
    pub interval_minutes: Option<u64>,
}

/// Arguments for the sources command.
#[derive(Debug, Parser)]
pub struct SourcesArgs {
    /// Only list this category
    #[arg(short = 'C', long, value_enum)]
    pub category: Option<CategoryArg>,
}

/// Source category argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CategoryArg {
    /// Academic sources
    Academic,
    /// Industry sources
    Industry,
    /// News sources
    News,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<CategoryArg> for SourceCategory {
    fn from(category: CategoryArg) -> Self {
        match category {
            CategoryArg::Academic => SourceCategory::Academic,
            CategoryArg::Industry => SourceCategory::Industry,
            CategoryArg::News => SourceCategory::News,
        }
    }
}
