//! Schedule command implementation.

use super::collect::handle_report;
use crate::cli::ScheduleArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;
use std::time::Duration;
use waypoint_fetch::HttpFetcher;
use waypoint_pipeline::{CollectWorker, Pipeline, PipelineReport};

/// Execute the schedule command.
pub async fn execute_schedule(
    args: ScheduleArgs,
    config: &Config,
    data_dir: &Path,
    formatter: &Formatter,
) -> Result<()> {
    let interval = schedule_interval(&args, config)?;

    let fetcher = HttpFetcher::new(&config.pipeline.fetch)?;
    let pipeline = Pipeline::new(config.pipeline.clone(), fetcher)?;
    let mut worker = CollectWorker::new(pipeline, interval);

    eprintln!(
        "{}",
        formatter.info(&format!(
            "Collecting every {} minutes (Ctrl+C to stop)",
            interval.as_secs() / 60
        ))
    );

    let sink = |report: PipelineReport| {
        if let Err(e) = handle_report(&report, data_dir, formatter) {
            tracing::error!("Failed to save collection: {}", e);
        }
    };

    match args.cycles {
        Some(cycles) => worker.run_cycles(sink, cycles).await?,
        None => worker.run(sink).await,
    }

    eprintln!(
        "{}",
        formatter.success(&format!(
            "Scheduler stopped after {} runs",
            worker.cycles_completed()
        ))
    );

    Ok(())
}

/// Interval between runs: the flag wins over the configuration.
fn schedule_interval(args: &ScheduleArgs, config: &Config) -> Result<Duration> {
    match args.interval_minutes {
        Some(0) => Err(CliError::InvalidInput(
            "Interval must be at least 1 minute".to_string(),
        )),
        Some(minutes) => Ok(Duration::from_secs(minutes * 60)),
        None => Ok(config.schedule_interval()),
    }
}
