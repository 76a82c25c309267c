//! Core pipeline implementation

use crate::{FetchFailure, PipelineConfig, PipelineError, PipelineMetrics, PipelineReport};
use futures::stream::{self, StreamExt};
use std::time::Instant;
use tracing::{debug, info, warn};
use waypoint_corroborator::{CorroborationAggregator, StrategyMatcher};
use waypoint_domain::traits::RecordFetcher;
use waypoint_domain::{ConfidenceScorer, RawRecord, SourceCatalog, SourceKey};
use waypoint_gatekeeper::{AcceptanceGate, FieldValidator, RejectedRecord};

/// Collection pipeline: fetch, validate, aggregate, score, gate
///
/// # Examples
///
/// ```
/// use waypoint_pipeline::{Pipeline, PipelineConfig};
/// use waypoint_fetch::MockFetcher;
/// use waypoint_domain::SourceCatalog;
///
/// let config = PipelineConfig::new(SourceCatalog::default());
/// let pipeline = Pipeline::new(config, MockFetcher::new()).unwrap();
///
/// let report = pipeline.run_batch(Vec::new()).unwrap();
/// assert!(report.is_empty());
/// ```
pub struct Pipeline<F> {
    config: PipelineConfig,
    fetcher: F,
    validator: FieldValidator,
    aggregator: CorroborationAggregator<StrategyMatcher>,
    scorer: ConfidenceScorer,
    gate: AcceptanceGate,
}

impl<F: RecordFetcher> Pipeline<F> {
    /// Create a new pipeline
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Config`] if any configuration section is
    /// invalid.
    pub fn new(config: PipelineConfig, fetcher: F) -> Result<Self, PipelineError> {
        config.validate()?;

        let validator = FieldValidator::new(config.validation.clone())
            .map_err(|e| PipelineError::Config(e.to_string()))?;
        let gate = AcceptanceGate::from_config(&config.validation)
            .map_err(|e| PipelineError::Config(e.to_string()))?;
        let scorer = ConfidenceScorer::new(config.scoring.clone(), config.validation.min_sources);
        let aggregator = CorroborationAggregator::new(config.matching.matcher());

        Ok(Self {
            config,
            fetcher,
            validator,
            aggregator,
            scorer,
            gate,
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Configured sources
    pub fn catalog(&self) -> &SourceCatalog {
        &self.config.catalog
    }

    /// Fetch every source and run the batch
    ///
    /// Sources are fetched concurrently, bounded by `fetch.concurrency`.
    /// Processing starts only after every fetch has finished. A failing
    /// source contributes zero records and is listed in the report.
    pub async fn collect(&self) -> Result<PipelineReport, PipelineError> {
        let started = Instant::now();

        let (raw, fetch_failures) = self.fetch_all().await;
        let mut report = self.process(raw)?;

        report.metrics.sources_queried = self.config.catalog.len();
        report.metrics.fetch_failures = fetch_failures.len();
        report.metrics.elapsed_ms = started.elapsed().as_millis() as u64;
        report.fetch_failures = fetch_failures;

        info!(
            "Collection finished: {} accepted from {} sources in {}ms",
            report.accepted.len(),
            report.metrics.sources_queried,
            report.metrics.elapsed_ms
        );
        Ok(report)
    }

    /// Run a frozen batch of raw records through validation, aggregation,
    /// scoring and acceptance
    ///
    /// The result depends only on the set of records given, not on their
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Invariant`] if a fact cannot be scored.
    pub fn run_batch(&self, raw: Vec<RawRecord>) -> Result<PipelineReport, PipelineError> {
        let started = Instant::now();
        let mut report = self.process(raw)?;
        report.metrics.elapsed_ms = started.elapsed().as_millis() as u64;
        Ok(report)
    }

    async fn fetch_all(&self) -> (Vec<RawRecord>, Vec<FetchFailure>) {
        let sources = self.config.catalog.all_sources();
        info!(
            "Fetching {} sources (concurrency: {})",
            sources.len(),
            self.config.fetch.concurrency
        );

        let mut results: Vec<(SourceKey, Result<Vec<RawRecord>, F::Error>)> =
            stream::iter(sources)
                .map(|source| async move { (source.key(), self.fetcher.fetch(source).await) })
                .buffer_unordered(self.config.fetch.concurrency.max(1))
                .collect()
                .await;
        results.sort_by(|a, b| a.0.cmp(&b.0));

        let mut raw = Vec::new();
        let mut failures = Vec::new();
        for (source, result) in results {
            match result {
                Ok(records) => {
                    debug!("{} returned {} records", source, records.len());
                    raw.extend(records);
                }
                Err(e) => {
                    warn!("Fetch from {} failed: {}", source, e);
                    failures.push(FetchFailure {
                        source,
                        error: e.to_string(),
                    });
                }
            }
        }
        (raw, failures)
    }

    fn process(&self, raw: Vec<RawRecord>) -> Result<PipelineReport, PipelineError> {
        let mut metrics = PipelineMetrics::new();
        let mut rejected_records = Vec::new();
        let mut validated = Vec::with_capacity(raw.len());

        // 1. Validate
        for record in raw {
            metrics.record_raw(record.source.category, 1);
            let result = if self.config.catalog.contains(&record.source) {
                self.validator.validate(record)
            } else {
                Err(RejectedRecord::unknown_source(&record))
            };
            match result {
                Ok(valid) => validated.push(valid),
                Err(rejected) => {
                    metrics.record_rejection(rejected.reason.code());
                    rejected_records.push(rejected);
                }
            }
        }
        rejected_records.sort();
        metrics.validated_records = validated.len();
        info!(
            "Validated {} of {} records",
            metrics.validated_records,
            metrics.total_raw()
        );

        // 2. Aggregate
        let facts = self.aggregator.aggregate(validated);
        metrics.facts_formed = facts.len();
        info!("Formed {} facts", metrics.facts_formed);

        // 3. Score
        let scored = facts
            .into_iter()
            .map(|fact| self.scorer.score(fact, &self.config.catalog))
            .collect::<Result<Vec<_>, _>>()?;

        // 4. Gate
        let outcome = self.gate.accept(scored);
        metrics.accepted = outcome.accepted.len();
        for rejected in &outcome.rejected {
            metrics.record_fact_rejection(rejected.reason.code());
        }
        info!(
            "Accepted {} facts, rejected {}",
            metrics.accepted,
            metrics.total_fact_rejections()
        );

        Ok(PipelineReport {
            accepted: outcome.accepted,
            rejected_facts: outcome.rejected,
            rejected_records,
            fetch_failures: Vec::new(),
            metrics,
        })
    }
}
