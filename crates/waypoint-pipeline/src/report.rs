//! Pipeline run results

use crate::PipelineMetrics;
use serde::{Deserialize, Serialize};
use waypoint_domain::{AcceptedRecord, SourceKey};
use waypoint_gatekeeper::{RejectedFact, RejectedRecord};

/// A source whose fetch failed; it contributed zero records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchFailure {
    /// Source that failed
    pub source: SourceKey,

    /// Error reported by the fetcher
    pub error: String,
}

/// Result of one pipeline run
///
/// `accepted` and `rejected_facts` depend only on the batch of raw records,
/// never on fetch order or timing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Accepted facts, best first
    pub accepted: Vec<AcceptedRecord>,

    /// Facts kept out by the acceptance gate
    pub rejected_facts: Vec<RejectedFact>,

    /// Records kept out by validation
    pub rejected_records: Vec<RejectedRecord>,

    /// Sources whose fetch failed
    pub fetch_failures: Vec<FetchFailure>,

    /// Run metrics
    pub metrics: PipelineMetrics,
}

impl PipelineReport {
    /// Whether nothing was accepted
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }
}
