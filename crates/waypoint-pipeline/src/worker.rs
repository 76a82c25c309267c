//! Background worker for scheduled collection

use crate::{Pipeline, PipelineError, PipelineReport};
use tokio::time::{interval, Duration, MissedTickBehavior};
use waypoint_domain::traits::RecordFetcher;

/// Default interval between scheduled runs (daily)
pub const DEFAULT_SCHEDULE_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Background worker that runs the pipeline on a schedule
///
/// The first run starts immediately; later runs follow at the configured
/// interval. Each report is handed to a caller-supplied sink.
///
/// # Examples
///
/// ```no_run
/// use waypoint_pipeline::{CollectWorker, Pipeline, PipelineConfig};
/// use waypoint_fetch::{FetchConfig, HttpFetcher};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = PipelineConfig::from_file("config/waypoint.toml")?;
///     let fetcher = HttpFetcher::new(&config.fetch)?;
///     let pipeline = Pipeline::new(config, fetcher)?;
///     let mut worker = CollectWorker::new(pipeline, std::time::Duration::from_secs(3600));
///
///     // Run indefinitely (until Ctrl+C)
///     worker.run(|report| println!("{}", report.metrics.summary())).await;
///     Ok(())
/// }
/// ```
pub struct CollectWorker<F> {
    pipeline: Pipeline<F>,
    interval: Duration,
    cycles_completed: usize,
}

impl<F: RecordFetcher> CollectWorker<F> {
    /// Create a new worker
    pub fn new(pipeline: Pipeline<F>, interval: Duration) -> Self {
        Self {
            pipeline,
            interval,
            cycles_completed: 0,
        }
    }

    /// Create a worker that runs once a day
    pub fn daily(pipeline: Pipeline<F>) -> Self {
        Self::new(pipeline, DEFAULT_SCHEDULE_INTERVAL)
    }

    /// Pipeline driven by this worker
    pub fn pipeline(&self) -> &Pipeline<F> {
        &self.pipeline
    }

    /// Interval between runs
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Successful runs so far
    pub fn cycles_completed(&self) -> usize {
        self.cycles_completed
    }

    /// Run the worker indefinitely
    ///
    /// Runs until a shutdown signal (Ctrl+C) is received. A failed run is
    /// logged and the worker waits for the next tick.
    pub async fn run<S>(&mut self, mut sink: S)
    where
        S: FnMut(PipelineReport),
    {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!("Collect worker started (interval: {:?})", self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tracing::debug!("Starting collection cycle");

                    match self.pipeline.collect().await {
                        Ok(report) => {
                            self.cycles_completed += 1;
                            tracing::info!(
                                "Cycle {} completed: {} accepted, {} facts rejected",
                                self.cycles_completed,
                                report.accepted.len(),
                                report.rejected_facts.len()
                            );
                            sink(report);
                        }
                        Err(e) => {
                            tracing::error!("Collection failed: {}", e);
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown signal received, stopping collect worker");
                    break;
                }
            }
        }

        tracing::info!(
            "Collect worker stopped after {} cycles",
            self.cycles_completed
        );
    }

    /// Run for a specific number of cycles
    ///
    /// # Errors
    ///
    /// Returns the first failed run's error.
    pub async fn run_cycles<S>(&mut self, mut sink: S, cycles: usize) -> Result<(), PipelineError>
    where
        S: FnMut(PipelineReport),
    {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            "Collect worker started for {} cycles (interval: {:?})",
            cycles,
            self.interval
        );

        for cycle in 0..cycles {
            ticker.tick().await;

            tracing::debug!("Starting collection cycle {}/{}", cycle + 1, cycles);

            match self.pipeline.collect().await {
                Ok(report) => {
                    self.cycles_completed += 1;
                    tracing::info!(
                        "Cycle {}/{} completed: {} accepted",
                        cycle + 1,
                        cycles,
                        report.accepted.len()
                    );
                    sink(report);
                }
                Err(e) => {
                    tracing::error!("Cycle {}/{} failed: {}", cycle + 1, cycles, e);
                    return Err(e);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PipelineConfig;
    use waypoint_domain::{RawRecord, Source, SourceCatalog, SourceCategory};
    use waypoint_fetch::MockFetcher;
    use waypoint_gatekeeper::ValidationConfig;

    fn pipeline() -> (Pipeline<MockFetcher>, MockFetcher) {
        let source = Source::new("Rail Gazette", "https://example.org", SourceCategory::News, 1);
        let record = RawRecord::new(source.key())
            .with_field("title", "Station reopening")
            .with_field("source", "Rail Gazette")
            .with_field("date", "2024-07-01")
            .with_field("content", "The station reopens next month.");
        let fetcher = MockFetcher::new().with_records(source.key(), vec![record]);

        let catalog = SourceCatalog::new(vec![source]).unwrap();
        let config = PipelineConfig::new(catalog).with_validation(ValidationConfig::permissive());
        (Pipeline::new(config, fetcher.clone()).unwrap(), fetcher)
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_cycles() {
        let (pipeline, fetcher) = pipeline();
        let mut worker = CollectWorker::new(pipeline, Duration::from_secs(60));

        let mut reports = Vec::new();
        worker.run_cycles(|r| reports.push(r), 3).await.unwrap();

        assert_eq!(reports.len(), 3);
        assert_eq!(worker.cycles_completed(), 3);
        assert_eq!(fetcher.call_count(), 3);
        assert!(reports.iter().all(|r| r.accepted.len() == 1));
        assert_eq!(reports[0].accepted, reports[2].accepted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycles_are_spaced_by_interval() {
        let (pipeline, _) = pipeline();
        let mut worker = CollectWorker::new(pipeline, Duration::from_secs(3600));

        let started = tokio::time::Instant::now();
        worker.run_cycles(|_| {}, 3).await.unwrap();

        // first tick fires immediately
        assert!(started.elapsed() >= Duration::from_secs(2 * 3600));
        assert!(started.elapsed() < Duration::from_secs(3 * 3600));
    }

    #[tokio::test]
    async fn test_zero_cycles() {
        let (pipeline, fetcher) = pipeline();
        let mut worker = CollectWorker::daily(pipeline);

        worker.run_cycles(|_| {}, 0).await.unwrap();
        assert_eq!(worker.cycles_completed(), 0);
        assert_eq!(fetcher.call_count(), 0);
        assert_eq!(worker.interval(), DEFAULT_SCHEDULE_INTERVAL);
    }
}
