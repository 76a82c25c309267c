//! Metrics collected during a pipeline run

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use waypoint_domain::SourceCategory;

/// Metrics collected during a pipeline run
///
/// Tracks raw records per category, fetch failures, and how many records and
/// facts were rejected for each reason.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineMetrics {
    /// Sources queried
    pub sources_queried: usize,

    /// Sources whose fetch failed
    pub fetch_failures: usize,

    /// Raw records received per category
    pub raw_records: BTreeMap<SourceCategory, usize>,

    /// Records that passed validation
    pub validated_records: usize,

    /// Rejected records per reason code
    pub record_rejections: BTreeMap<String, usize>,

    /// Facts formed by aggregation
    pub facts_formed: usize,

    /// Facts accepted
    pub accepted: usize,

    /// Rejected facts per reason code
    pub fact_rejections: BTreeMap<String, usize>,

    /// Wall-clock duration of the run in milliseconds
    pub elapsed_ms: u64,
}

impl PipelineMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record raw records received from a category
    pub fn record_raw(&mut self, category: SourceCategory, count: usize) {
        *self.raw_records.entry(category).or_insert(0) += count;
    }

    /// Record a rejected record
    pub fn record_rejection(&mut self, code: &str) {
        *self.record_rejections.entry(code.to_string()).or_insert(0) += 1;
    }

    /// Record a rejected fact
    pub fn record_fact_rejection(&mut self, code: &str) {
        *self.fact_rejections.entry(code.to_string()).or_insert(0) += 1;
    }

    /// Total raw records across categories
    pub fn total_raw(&self) -> usize {
        self.raw_records.values().sum()
    }

    /// Total rejected records
    pub fn total_record_rejections(&self) -> usize {
        self.record_rejections.values().sum()
    }

    /// Total rejected facts
    pub fn total_fact_rejections(&self) -> usize {
        self.fact_rejections.values().sum()
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Collection Summary".to_string(),
            "==================".to_string(),
            format!(
                "Sources queried: {} ({} failed)",
                self.sources_queried, self.fetch_failures
            ),
            format!("Raw records: {}", self.total_raw()),
        ];

        if !self.raw_records.is_empty() {
            lines.push("Records by source category:".to_string());
            for (category, count) in &self.raw_records {
                lines.push(format!("  {}: {}", category, count));
            }
        }

        lines.push(format!(
            "Validated records: {} ({} rejected)",
            self.validated_records,
            self.total_record_rejections()
        ));
        for (reason, count) in &self.record_rejections {
            lines.push(format!("  {}: {}", reason, count));
        }

        lines.push(format!("Facts formed: {}", self.facts_formed));
        lines.push(format!(
            "Accepted: {} ({} rejected)",
            self.accepted,
            self.total_fact_rejections()
        ));
        for (reason, count) in &self.fact_rejections {
            lines.push(format!("  {}: {}", reason, count));
        }

        lines.push(format!("Elapsed: {}ms", self.elapsed_ms));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = PipelineMetrics::new();
        assert_eq!(metrics.total_raw(), 0);
        assert_eq!(metrics.total_record_rejections(), 0);
        assert_eq!(metrics.total_fact_rejections(), 0);
    }

    #[test]
    fn test_record_raw() {
        let mut metrics = PipelineMetrics::new();
        metrics.record_raw(SourceCategory::News, 5);
        metrics.record_raw(SourceCategory::Academic, 2);
        metrics.record_raw(SourceCategory::News, 1);

        assert_eq!(metrics.raw_records[&SourceCategory::News], 6);
        assert_eq!(metrics.total_raw(), 8);
    }

    #[test]
    fn test_rejection_counts() {
        let mut metrics = PipelineMetrics::new();
        metrics.record_rejection("missing_field");
        metrics.record_rejection("missing_field");
        metrics.record_rejection("malformed_date");
        metrics.record_fact_rejection("low_confidence");

        assert_eq!(metrics.record_rejections["missing_field"], 2);
        assert_eq!(metrics.total_record_rejections(), 3);
        assert_eq!(metrics.total_fact_rejections(), 1);
    }

    #[test]
    fn test_summary() {
        let mut metrics = PipelineMetrics::new();
        metrics.sources_queried = 4;
        metrics.fetch_failures = 1;
        metrics.record_raw(SourceCategory::Industry, 3);
        metrics.validated_records = 2;
        metrics.record_rejection("content_too_short");
        metrics.facts_formed = 2;
        metrics.accepted = 1;
        metrics.record_fact_rejection("insufficient_sources");

        let summary = metrics.summary();
        assert!(summary.contains("Sources queried: 4 (1 failed)"));
        assert!(summary.contains("industry: 3"));
        assert!(summary.contains("content_too_short: 1"));
        assert!(summary.contains("Accepted: 1 (1 rejected)"));
        assert!(summary.contains("insufficient_sources: 1"));
    }
}
