//! Fact acceptance logic

use crate::{GatekeeperError, ValidationConfig};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use uuid::Uuid;
use waypoint_domain::{AcceptedRecord, FactKey, ScoredFact};

/// Reasons a scored fact is kept out of the accepted set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum GateRejection {
    /// Fewer distinct sources than required
    InsufficientSources {
        /// Distinct sources behind the fact
        distinct: usize,
        /// Required minimum
        required: usize,
    },

    /// Enough sources, but confidence below the floor
    LowConfidence {
        /// Computed confidence
        confidence: f64,
        /// Required minimum
        threshold: f64,
    },
}

impl GateRejection {
    /// Stable reason code
    pub fn code(&self) -> &'static str {
        match self {
            GateRejection::InsufficientSources { .. } => "insufficient_sources",
            GateRejection::LowConfidence { .. } => "low_confidence",
        }
    }
}

impl fmt::Display for GateRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateRejection::InsufficientSources { distinct, required } => {
                write!(f, "insufficient sources ({} < {})", distinct, required)
            }
            GateRejection::LowConfidence {
                confidence,
                threshold,
            } => write!(f, "low confidence ({:.3} < {:.3})", confidence, threshold),
        }
    }
}

/// A fact that did not pass the gate, kept for diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedFact {
    /// Deterministic fact identifier
    pub fact_id: Uuid,

    /// Canonical fact key
    pub fact_key: FactKey,

    /// Title of the representative record
    pub title: String,

    /// Distinct corroborating sources
    pub distinct_sources: usize,

    /// Computed confidence
    pub confidence: f64,

    /// Why the fact was rejected
    #[serde(flatten)]
    pub reason: GateRejection,
}

/// Result of running the gate over a batch of scored facts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GateOutcome {
    /// Accepted facts, best first
    pub accepted: Vec<AcceptedRecord>,

    /// Rejected facts with reasons, in the same ranking order
    pub rejected: Vec<RejectedFact>,
}

/// Applies the corroboration floor and the confidence floor
///
/// Both thresholds are inclusive.
#[derive(Debug, Clone)]
pub struct AcceptanceGate {
    min_sources: usize,
    confidence_threshold: f64,
}

impl AcceptanceGate {
    /// Create a new gate
    pub fn new(min_sources: usize, confidence_threshold: f64) -> Result<Self, GatekeeperError> {
        if min_sources == 0 {
            return Err(GatekeeperError::Config(
                "min_sources must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&confidence_threshold) {
            return Err(GatekeeperError::Config(format!(
                "confidence_threshold must be in [0, 1], got {}",
                confidence_threshold
            )));
        }
        Ok(Self {
            min_sources,
            confidence_threshold,
        })
    }

    /// Create a gate from validation configuration
    pub fn from_config(config: &ValidationConfig) -> Result<Self, GatekeeperError> {
        Self::new(config.min_sources, config.confidence_threshold)
    }

    /// Minimum distinct sources
    pub fn min_sources(&self) -> usize {
        self.min_sources
    }

    /// Confidence floor
    pub fn confidence_threshold(&self) -> f64 {
        self.confidence_threshold
    }

    /// Decide why a fact would be rejected, if at all
    ///
    /// Insufficient corroboration is reported regardless of confidence.
    pub fn check(&self, scored: &ScoredFact) -> Option<GateRejection> {
        let distinct = scored.distinct_sources();
        if distinct < self.min_sources {
            return Some(GateRejection::InsufficientSources {
                distinct,
                required: self.min_sources,
            });
        }
        if !scored.confidence.meets(self.confidence_threshold) {
            return Some(GateRejection::LowConfidence {
                confidence: scored.confidence.value(),
                threshold: self.confidence_threshold,
            });
        }
        None
    }

    /// Split scored facts into accepted and rejected
    ///
    /// Both lists are ordered by descending confidence, then descending
    /// distinct sources, then earliest supporting date, then fact key.
    pub fn accept(&self, mut scored: Vec<ScoredFact>) -> GateOutcome {
        scored.sort_by(rank);

        let mut outcome = GateOutcome::default();
        for fact in &scored {
            match self.check(fact) {
                None => outcome.accepted.push(AcceptedRecord::from(fact)),
                Some(reason) => {
                    tracing::debug!("Rejected fact {}: {}", fact.fact.key(), reason);
                    outcome.rejected.push(RejectedFact {
                        fact_id: fact.fact.id(),
                        fact_key: fact.fact.key().clone(),
                        title: fact.representative().title().to_string(),
                        distinct_sources: fact.distinct_sources(),
                        confidence: fact.confidence.value(),
                        reason,
                    });
                }
            }
        }
        outcome
    }
}

/// Ranking order of scored facts, best first
fn rank(a: &ScoredFact, b: &ScoredFact) -> Ordering {
    b.confidence
        .value()
        .total_cmp(&a.confidence.value())
        .then_with(|| b.distinct_sources().cmp(&a.distinct_sources()))
        .then_with(|| a.fact.earliest_date().cmp(&b.fact.earliest_date()))
        .then_with(|| a.fact.key().cmp(b.fact.key()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use waypoint_domain::{
        Confidence, Fact, RawRecord, SourceCategory, SourceKey, ValidatedRecord,
    };

    fn scored(title: &str, sources: usize, confidence: f64, day: u32) -> ScoredFact {
        let records = (0..sources)
            .map(|i| {
                let raw = RawRecord::new(SourceKey::new(SourceCategory::News, format!("s{}", i)))
                    .with_field("title", title)
                    .with_field("source", format!("s{}", i))
                    .with_field("date", "ignored")
                    .with_field("content", "Body");
                ValidatedRecord::new(raw, NaiveDate::from_ymd_opt(2024, 4, day).unwrap()).unwrap()
            })
            .collect();
        ScoredFact {
            fact: Fact::from_records(records).unwrap(),
            confidence: Confidence::new(confidence),
            lead_source: SourceKey::new(SourceCategory::News, "s0"),
        }
    }

    #[test]
    fn test_accepts_at_exact_thresholds() {
        let gate = AcceptanceGate::new(3, 0.8).unwrap();
        let outcome = gate.accept(vec![scored("Tram extension", 3, 0.8, 1)]);
        assert_eq!(outcome.accepted.len(), 1);
        assert!(outcome.rejected.is_empty());
        assert_eq!(outcome.accepted[0].distinct_sources, 3);
    }

    #[test]
    fn test_full_confidence_accepted() {
        let gate = AcceptanceGate::new(3, 0.8).unwrap();
        let outcome = gate.accept(vec![scored("Tram extension", 3, 1.0, 1)]);
        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(outcome.accepted[0].confidence, 1.0);
    }

    #[test]
    fn test_insufficient_sources_regardless_of_confidence() {
        let gate = AcceptanceGate::new(3, 0.8).unwrap();
        let outcome = gate.accept(vec![scored("Tram extension", 2, 1.0, 1)]);
        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].reason.code(), "insufficient_sources");
    }

    #[test]
    fn test_low_confidence() {
        let gate = AcceptanceGate::new(2, 0.8).unwrap();
        let outcome = gate.accept(vec![scored("Tram extension", 2, 0.79, 1)]);
        assert!(outcome.accepted.is_empty());
        assert_eq!(
            outcome.rejected[0].reason,
            GateRejection::LowConfidence {
                confidence: 0.79,
                threshold: 0.8
            }
        );
    }

    #[test]
    fn test_ordering() {
        let gate = AcceptanceGate::new(1, 0.0).unwrap();
        let outcome = gate.accept(vec![
            scored("later tie", 2, 0.9, 10),
            scored("fewer sources", 1, 0.9, 1),
            scored("best", 1, 0.95, 20),
            scored("earlier tie", 2, 0.9, 5),
        ]);
        let titles: Vec<_> = outcome.accepted.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["best", "earlier tie", "later tie", "fewer sources"]);
    }

    #[test]
    fn test_invalid_gate_config() {
        assert!(AcceptanceGate::new(0, 0.5).is_err());
        assert!(AcceptanceGate::new(1, 1.5).is_err());
        assert!(AcceptanceGate::new(1, -0.1).is_err());
        assert!(AcceptanceGate::from_config(&ValidationConfig::default()).is_ok());
    }

    #[test]
    fn test_gate_is_deterministic() {
        let gate = AcceptanceGate::new(2, 0.5).unwrap();
        let batch = || {
            vec![
                scored("a", 2, 0.7, 3),
                scored("b", 1, 0.9, 2),
                scored("c", 3, 0.7, 3),
            ]
        };
        let mut reversed = batch();
        reversed.reverse();
        assert_eq!(gate.accept(batch()), gate.accept(reversed));
    }
}
