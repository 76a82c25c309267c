//! Collect command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use crate::persist::{self, CollectionOutput};
use chrono::Utc;
use std::path::{Path, PathBuf};
use waypoint_fetch::HttpFetcher;
use waypoint_pipeline::{Pipeline, PipelineReport};

/// Execute the collect command.
pub async fn execute_collect(config: &Config, data_dir: &Path, formatter: &Formatter) -> Result<()> {
    let fetcher = HttpFetcher::new(&config.pipeline.fetch)?;
    let pipeline = Pipeline::new(config.pipeline.clone(), fetcher)?;

    eprintln!(
        "{}",
        formatter.info(&format!(
            "Collecting from {} sources",
            pipeline.catalog().len()
        ))
    );

    let report = pipeline.collect().await?;
    handle_report(&report, data_dir, formatter)?;

    Ok(())
}

/// Print a run's outcome and save its accepted records.
///
/// Returns the written file, or `None` when the run produced nothing.
pub fn handle_report(
    report: &PipelineReport,
    data_dir: &Path,
    formatter: &Formatter,
) -> Result<Option<PathBuf>> {
    eprintln!("{}", report.metrics.summary());

    for failure in &report.fetch_failures {
        eprintln!(
            "{}",
            formatter.warning(&format!("{} failed: {}", failure.source, failure.error))
        );
    }

    if report.is_empty() {
        eprintln!("{}", formatter.warning("No data was collected"));
        return Ok(None);
    }

    let output = CollectionOutput::from_report(report, Utc::now());
    let path = persist::save(data_dir, &output)?;

    eprintln!(
        "{}",
        formatter.success(&format!(
            "Saved {} records to {}",
            output.accepted.len(),
            path.display()
        ))
    );
    println!("{}", formatter.format_accepted(&output.accepted)?);

    Ok(Some(path))
}
