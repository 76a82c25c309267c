//! Analyze command implementation.

use crate::cli::AnalyzeArgs;
use crate::error::Result;
use crate::output::Formatter;
use crate::persist::{self, CollectionOutput};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use waypoint_domain::{AcceptedRecord, SourceCategory};

/// Records shown in the sample.
const SAMPLE_SIZE: usize = 5;

/// Summary of a saved collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    /// When the collection ran
    pub generated_at: DateTime<Utc>,

    /// Accepted records in the file
    pub total: usize,

    /// Accepted records backed by each source category
    pub by_category: BTreeMap<SourceCategory, usize>,

    /// Mean confidence of accepted records
    pub mean_confidence: Option<f64>,

    /// Facts rejected by the acceptance gate
    pub rejected: usize,

    /// First few accepted records
    pub sample: Vec<AcceptedRecord>,
}

impl Analysis {
    /// Summarize a collection.
    pub fn of(output: &CollectionOutput) -> Self {
        let mut by_category = BTreeMap::new();
        for record in &output.accepted {
            for category in &record.categories {
                *by_category.entry(*category).or_insert(0) += 1;
            }
        }

        let mean_confidence = if output.accepted.is_empty() {
            None
        } else {
            let sum: f64 = output.accepted.iter().map(|r| r.confidence).sum();
            Some(sum / output.accepted.len() as f64)
        };

        Self {
            generated_at: output.generated_at,
            total: output.accepted.len(),
            by_category,
            mean_confidence,
            rejected: output.rejected.len(),
            sample: output.accepted.iter().take(SAMPLE_SIZE).cloned().collect(),
        }
    }
}

/// Execute the analyze command.
pub fn execute_analyze(args: AnalyzeArgs, data_dir: &Path, formatter: &Formatter) -> Result<()> {
    let path = persist::resolve_input(data_dir, &args.filename);
    tracing::debug!("Analyzing {}", path.display());

    let output = persist::load(&path)?;
    let analysis = Analysis::of(&output);

    println!("{}", formatter.format_analysis(&analysis)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use chrono::{NaiveDate, TimeZone};
    use waypoint_domain::SourceKey;

    fn record(title: &str, confidence: f64, categories: Vec<SourceCategory>) -> AcceptedRecord {
        let sources = categories
            .iter()
            .map(|c| SourceKey::new(*c, format!("{} desk", c)))
            .collect::<Vec<_>>();
        let json = serde_json::json!({
            "fact_id": uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, title.as_bytes()),
            "fact_key": format!("title:{}@2024-05-01", title.to_lowercase()),
            "title": title,
            "publisher": "Transit Review",
            "date": NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            "content": "Body text.",
            "confidence": confidence,
            "distinct_sources": sources.len(),
            "sources": sources,
            "categories": categories,
            "supporting_records": sources.len()
        });
        serde_json::from_value(json).unwrap()
    }

    fn collection(accepted: Vec<AcceptedRecord>) -> CollectionOutput {
        CollectionOutput {
            generated_at: Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap(),
            accepted,
            rejected: Vec::new(),
        }
    }

    #[test]
    fn test_analysis_counts() {
        let output = collection(vec![
            record(
                "Bus lanes extended",
                0.8,
                vec![SourceCategory::Academic, SourceCategory::News],
            ),
            record("Rail fares frozen", 1.0, vec![SourceCategory::News]),
        ]);

        let analysis = Analysis::of(&output);
        assert_eq!(analysis.total, 2);
        assert_eq!(analysis.by_category[&SourceCategory::News], 2);
        assert_eq!(analysis.by_category[&SourceCategory::Academic], 1);
        assert!(!analysis.by_category.contains_key(&SourceCategory::Industry));
        assert!((analysis.mean_confidence.unwrap() - 0.9).abs() < 1e-9);
        assert_eq!(analysis.sample.len(), 2);
        assert_eq!(
            analysis.sample[0].fact_key.as_str(),
            "title:bus lanes extended@2024-05-01"
        );
    }

    #[test]
    fn test_sample_is_capped() {
        let accepted = (0..8)
            .map(|i| record(&format!("Item {}", i), 0.7, vec![SourceCategory::Industry]))
            .collect();
        let analysis = Analysis::of(&collection(accepted));
        assert_eq!(analysis.total, 8);
        assert_eq!(analysis.sample.len(), SAMPLE_SIZE);
    }

    #[test]
    fn test_empty_collection() {
        let analysis = Analysis::of(&collection(Vec::new()));
        assert_eq!(analysis.total, 0);
        assert!(analysis.mean_confidence.is_none());
        assert!(analysis.by_category.is_empty());
    }

    #[test]
    fn test_execute_analyze_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let output = collection(vec![record("Bus lanes extended", 0.8, vec![SourceCategory::News])]);
        let path = persist::save(dir.path(), &output).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap().to_string();

        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let result = execute_analyze(AnalyzeArgs { filename: name }, dir.path(), &formatter);
        assert!(result.is_ok());

        let missing = execute_analyze(
            AnalyzeArgs {
                filename: "transport_data_19990101_000000.json".to_string(),
            },
            dir.path(),
            &formatter,
        );
        assert!(missing.is_err());
    }
}
