//! Waypoint Pipeline
//!
//! Turns raw per-source records into a vetted data set with quantified trust.
//!
//! # Architecture
//!
//! ```text
//! SourceCatalog → RecordFetcher → FieldValidator → CorroborationAggregator
//!               → ConfidenceScorer → AcceptanceGate → PipelineReport
//! ```
//!
//! Fetching is concurrent and bounded; every later stage runs on the closed
//! batch once all fetches are done. A failing source contributes zero records
//! and never aborts the run.
//!
//! # Example Usage
//!
//! ```no_run
//! use waypoint_pipeline::{Pipeline, PipelineConfig};
//! use waypoint_fetch::HttpFetcher;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::from_file("config/waypoint.toml")?;
//! let fetcher = HttpFetcher::new(&config.fetch)?;
//! let pipeline = Pipeline::new(config, fetcher)?;
//!
//! let report = pipeline.collect().await?;
//!
//! println!("Accepted: {}", report.accepted.len());
//! println!("{}", report.metrics.summary());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod metrics;
mod pipeline;
mod report;
mod worker;

pub use config::{ConfigFile, PipelineConfig, SourceEntry};
pub use error::PipelineError;
pub use metrics::PipelineMetrics;
pub use pipeline::Pipeline;
pub use report::{FetchFailure, PipelineReport};
pub use worker::{CollectWorker, DEFAULT_SCHEDULE_INTERVAL};
