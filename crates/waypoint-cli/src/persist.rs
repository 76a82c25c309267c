//! Saving and loading collected data.

use crate::error::{CliError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use waypoint_domain::AcceptedRecord;
use waypoint_gatekeeper::RejectedFact;
use waypoint_pipeline::PipelineReport;

/// Contents of a saved collection file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionOutput {
    /// When the collection ran
    pub generated_at: DateTime<Utc>,

    /// Accepted facts, best first
    pub accepted: Vec<AcceptedRecord>,

    /// Facts rejected by the acceptance gate
    #[serde(default)]
    pub rejected: Vec<RejectedFact>,
}

impl CollectionOutput {
    /// Capture the persistent part of a report.
    pub fn from_report(report: &PipelineReport, generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            accepted: report.accepted.clone(),
            rejected: report.rejected_facts.clone(),
        }
    }
}

/// File name for a collection taken at `at`.
pub fn output_file_name(at: DateTime<Utc>) -> String {
    format!("transport_data_{}.json", at.format("%Y%m%d_%H%M%S"))
}

/// Write a collection into `dir`, creating it if needed.
pub fn save(dir: &Path, output: &CollectionOutput) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(output_file_name(output.generated_at));
    let contents = serde_json::to_string_pretty(output)?;
    fs::write(&path, contents)?;
    tracing::info!("Saved {} records to {}", output.accepted.len(), path.display());
    Ok(path)
}

/// Read a saved collection.
pub fn load(path: &Path) -> Result<CollectionOutput> {
    let contents = fs::read_to_string(path).map_err(|e| {
        CliError::InvalidInput(format!("Cannot read {}: {}", path.display(), e))
    })?;
    Ok(serde_json::from_str(&contents)?)
}

/// Locate a file given as a path or as a name inside the data directory.
pub fn resolve_input(data_dir: &Path, filename: &str) -> PathBuf {
    let direct = PathBuf::from(filename);
    if direct.exists() {
        direct
    } else {
        data_dir.join(filename)
    }
}
