//! Confidence computation module
//!
//! Combines corroboration breadth and source trust into a single confidence
//! value:
//!
//! ```text
//! priority_weight(s) = 1 / priority(s)
//! breadth_term       = min(distinct_sources / min_sources, 1.0)
//! trust_term         = mean(priority_weight(s) for distinct s) / MAX_PRIORITY_WEIGHT
//! confidence         = clamp(wb * breadth_term + wt * trust_term, 0, 1)
//! ```
//!
//! The weights `wb`/`wt` are normalized by their sum, so the defaults of
//! 0.5/0.5 reproduce the formula exactly.

use crate::traits::SourceLookup;
use crate::{Confidence, Fact, ScoredFact, SourceKey};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default weight of the corroboration breadth term
pub const BREADTH_WEIGHT: f64 = 0.5;

/// Default weight of the source trust term
pub const TRUST_WEIGHT: f64 = 0.5;

/// Weight of a priority-1 source, the most a source can weigh
pub const MAX_PRIORITY_WEIGHT: f64 = 1.0;

/// Internal consistency failures while scoring
///
/// These never arise from valid input; they indicate a logic bug upstream.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    /// A fact with no contributing sources reached the scorer
    #[error("Fact {0} has no contributing sources")]
    EmptyFact(String),

    /// A contributing source is not in the lookup
    #[error("Fact {fact} references unknown source {source_key}")]
    UnknownSource {
        /// Key of the fact being scored
        fact: String,
        /// The unresolved source
        source_key: SourceKey,
    },
}

/// Configuration for confidence computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Weight of the breadth term
    #[serde(default = "default_breadth_weight")]
    pub breadth_weight: f64,

    /// Weight of the trust term
    #[serde(default = "default_trust_weight")]
    pub trust_weight: f64,
}

fn default_breadth_weight() -> f64 {
    BREADTH_WEIGHT
}

fn default_trust_weight() -> f64 {
    TRUST_WEIGHT
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            breadth_weight: BREADTH_WEIGHT,
            trust_weight: TRUST_WEIGHT,
        }
    }
}

impl ScoringConfig {
    /// Validate the weights
    pub fn validate(&self) -> Result<(), String> {
        for (name, weight) in [
            ("breadth_weight", self.breadth_weight),
            ("trust_weight", self.trust_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(format!("{} must be a non-negative number, got {}", name, weight));
            }
        }
        if self.breadth_weight + self.trust_weight <= 0.0 {
            return Err("breadth_weight and trust_weight cannot both be zero".to_string());
        }
        Ok(())
    }
}

/// Scores facts against a source lookup
#[derive(Debug, Clone)]
pub struct ConfidenceScorer {
    config: ScoringConfig,
    min_sources: usize,
}

impl ConfidenceScorer {
    /// Create a scorer; `min_sources` below 1 is treated as 1
    pub fn new(config: ScoringConfig, min_sources: usize) -> Self {
        Self {
            config,
            min_sources: min_sources.max(1),
        }
    }

    /// Score a fact
    ///
    /// The lead source of the result is the most trusted contributor (lowest
    /// priority, ties broken by source key).
    pub fn score<L>(&self, fact: Fact, lookup: &L) -> Result<ScoredFact, ScoringError>
    where
        L: SourceLookup + ?Sized,
    {
        let mut contributors = Vec::new();
        for key in fact.sources() {
            let source = lookup.lookup(key).ok_or_else(|| ScoringError::UnknownSource {
                fact: fact.key().to_string(),
                source_key: key.clone(),
            })?;
            contributors.push(source);
        }

        let lead = contributors
            .iter()
            .min_by(|a, b| (a.priority, a.key()).cmp(&(b.priority, b.key())))
            .ok_or_else(|| ScoringError::EmptyFact(fact.key().to_string()))?;
        let lead_source = lead.key();

        let weights: Vec<f64> = contributors.iter().map(|s| s.priority_weight()).collect();
        let confidence = compute_confidence(weights.len(), self.min_sources, &weights, &self.config);

        Ok(ScoredFact {
            fact,
            confidence,
            lead_source,
        })
    }
}

/// Compute confidence from distinct source count and source weights
pub fn compute_confidence(
    distinct_sources: usize,
    min_sources: usize,
    weights: &[f64],
    config: &ScoringConfig,
) -> Confidence {
    let breadth = breadth_term(distinct_sources, min_sources);
    let trust = trust_term(weights);

    let total_weight = config.breadth_weight + config.trust_weight;
    if total_weight <= 0.0 {
        return Confidence::ZERO;
    }

    let combined = (config.breadth_weight * breadth + config.trust_weight * trust) / total_weight;
    Confidence::clamped(combined)
}

/// Corroboration breadth, saturating at `min_sources`
fn breadth_term(distinct_sources: usize, min_sources: usize) -> f64 {
    let min_sources = min_sources.max(1);
    (distinct_sources as f64 / min_sources as f64).min(1.0)
}

/// Mean source weight normalized by the weight of a priority-1 source
fn trust_term(weights: &[f64]) -> f64 {
    if weights.is_empty() {
        return 0.0;
    }
    let mean = weights.iter().sum::<f64>() / weights.len() as f64;
    (mean / MAX_PRIORITY_WEIGHT).clamp(0.0, 1.0)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: confidence is always in [0, 1]
        #[test]
        fn test_confidence_range(
            priorities in prop::collection::vec(1u32..20, 1..8),
            min_sources in 1usize..6,
            breadth_weight in 0.0f64..5.0,
            trust_weight in 0.01f64..5.0,
        ) {
            let weights: Vec<f64> = priorities.iter().map(|p| 1.0 / *p as f64).collect();
            let config = ScoringConfig { breadth_weight, trust_weight };
            let confidence = compute_confidence(weights.len(), min_sources, &weights, &config);
            prop_assert!(confidence.value() >= 0.0 && confidence.value() <= 1.0);
        }

        /// Property: more sources of the same priority never lower confidence
        #[test]
        fn test_breadth_monotonic(
            priority in 1u32..10,
            base in 1usize..5,
            extra in 0usize..5,
            min_sources in 1usize..6,
        ) {
            let weight = 1.0 / priority as f64;
            let config = ScoringConfig::default();
            let fewer = compute_confidence(base, min_sources, &vec![weight; base], &config);
            let more = compute_confidence(base + extra, min_sources, &vec![weight; base + extra], &config);
            prop_assert!(more.value() >= fewer.value());
        }

        /// Property: more trusted sources never lower confidence
        #[test]
        fn test_trust_monotonic(
            priorities in prop::collection::vec(2u32..10, 1..6),
            index in 0usize..6,
            min_sources in 1usize..6,
        ) {
            let index = index % priorities.len();
            let config = ScoringConfig::default();
            let weights: Vec<f64> = priorities.iter().map(|p| 1.0 / *p as f64).collect();
            let mut promoted = weights.clone();
            promoted[index] = 1.0 / (priorities[index] - 1) as f64;

            let base = compute_confidence(weights.len(), min_sources, &weights, &config);
            let better = compute_confidence(promoted.len(), min_sources, &promoted, &config);
            prop_assert!(better.value() >= base.value());
        }
    }
}
