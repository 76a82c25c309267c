//! Matching strategies deciding when two records describe the same fact

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use waypoint_domain::fact::normalize_text;
use waypoint_domain::traits::FactMatcher;
use waypoint_domain::ValidatedRecord;

/// Default similarity threshold for fuzzy matching
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Which matcher the pipeline uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Equal fact keys
    #[default]
    Exact,
    /// Same date and similar titles
    Fuzzy,
}

/// Matching configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Strategy to use
    #[serde(default)]
    pub strategy: MatchStrategy,

    /// Minimum token similarity for fuzzy matching, in (0, 1]
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
}

fn default_similarity_threshold() -> f64 {
    DEFAULT_SIMILARITY_THRESHOLD
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            strategy: MatchStrategy::Exact,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl MatchingConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.similarity_threshold > 0.0 && self.similarity_threshold <= 1.0) {
            return Err(format!(
                "similarity_threshold must be in (0, 1], got {}",
                self.similarity_threshold
            ));
        }
        Ok(())
    }

    /// Build the configured matcher
    pub fn matcher(&self) -> StrategyMatcher {
        match self.strategy {
            MatchStrategy::Exact => StrategyMatcher::Exact(ExactMatcher),
            MatchStrategy::Fuzzy => {
                StrategyMatcher::Fuzzy(FuzzyMatcher::new(self.similarity_threshold))
            }
        }
    }
}

/// Subjects decide when both records carry one
fn subjects(a: &ValidatedRecord, b: &ValidatedRecord) -> Option<bool> {
    match (a.subject_key(), b.subject_key()) {
        (Some(x), Some(y)) => Some(x == y),
        _ => None,
    }
}

/// Records match on equal normalized subjects
///
/// The subject is compared only when both records carry one. Otherwise the
/// records match when their normalized titles and publication dates are equal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatcher;

impl FactMatcher for ExactMatcher {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn matches(&self, a: &ValidatedRecord, b: &ValidatedRecord) -> bool {
        subjects(a, b).unwrap_or_else(|| a.date() == b.date() && a.title_key() == b.title_key())
    }
}

/// Records match when published the same day with similar titles
///
/// Similarity is the Jaccard index of the normalized title tokens. As with
/// [`ExactMatcher`], subjects decide when both records carry one.
#[derive(Debug, Clone, Copy)]
pub struct FuzzyMatcher {
    threshold: f64,
}

impl FuzzyMatcher {
    /// Create a fuzzy matcher; the threshold is clamped into (0, 1]
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_nan() {
            DEFAULT_SIMILARITY_THRESHOLD
        } else {
            threshold.clamp(f64::MIN_POSITIVE, 1.0)
        };
        Self { threshold }
    }

    /// Similarity threshold
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

impl FactMatcher for FuzzyMatcher {
    fn name(&self) -> &'static str {
        "fuzzy"
    }

    fn matches(&self, a: &ValidatedRecord, b: &ValidatedRecord) -> bool {
        subjects(a, b).unwrap_or_else(|| {
            a.date() == b.date() && token_similarity(a.title_key(), b.title_key()) >= self.threshold
        })
    }
}

/// Matcher selected from configuration
#[derive(Debug, Clone, Copy)]
pub enum StrategyMatcher {
    /// Exact key matching
    Exact(ExactMatcher),
    /// Fuzzy title matching
    Fuzzy(FuzzyMatcher),
}

impl FactMatcher for StrategyMatcher {
    fn name(&self) -> &'static str {
        match self {
            StrategyMatcher::Exact(m) => m.name(),
            StrategyMatcher::Fuzzy(m) => m.name(),
        }
    }

    fn matches(&self, a: &ValidatedRecord, b: &ValidatedRecord) -> bool {
        match self {
            StrategyMatcher::Exact(m) => m.matches(a, b),
            StrategyMatcher::Fuzzy(m) => m.matches(a, b),
        }
    }
}

/// Jaccard similarity of normalized title tokens, 0.0 when both are empty
pub fn title_similarity(a: &str, b: &str) -> f64 {
    token_similarity(&normalize_text(a), &normalize_text(b))
}

/// Jaccard similarity of two already normalized texts
fn token_similarity(a: &str, b: &str) -> f64 {
    let left: BTreeSet<&str> = a.split(' ').filter(|t| !t.is_empty()).collect();
    let right: BTreeSet<&str> = b.split(' ').filter(|t| !t.is_empty()).collect();

    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }
    left.intersection(&right).count() as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use waypoint_domain::{RawRecord, SourceCategory, SourceKey};

    fn record(source: &str, title: &str, day: u32) -> ValidatedRecord {
        let raw = RawRecord::new(SourceKey::new(SourceCategory::Industry, source))
            .with_field("title", title)
            .with_field("source", source)
            .with_field("date", "ignored")
            .with_field("content", "Body text");
        ValidatedRecord::new(raw, NaiveDate::from_ymd_opt(2024, 2, day).unwrap()).unwrap()
    }

    #[test]
    fn test_exact_ignores_case_and_punctuation() {
        let a = record("a", "Congestion Charge: Phase 2", 1);
        let b = record("b", "congestion charge phase 2", 1);
        assert!(ExactMatcher.matches(&a, &b));
    }

    #[test]
    fn test_exact_requires_same_date() {
        let a = record("a", "Congestion charge", 1);
        let b = record("b", "Congestion charge", 2);
        assert!(!ExactMatcher.matches(&a, &b));
    }

    fn with_subject(source: &str, title: &str, day: u32, subject: &str) -> ValidatedRecord {
        let raw = RawRecord::new(SourceKey::new(SourceCategory::News, source))
            .with_field("title", title)
            .with_field("source", source)
            .with_field("date", "ignored")
            .with_field("content", "Body")
            .with_field("subject", subject);
        ValidatedRecord::new(raw, NaiveDate::from_ymd_opt(2024, 2, day).unwrap()).unwrap()
    }

    #[test]
    fn test_exact_uses_subject_when_both_have_one() {
        let a = with_subject("a", "LEZ expands", 1, "Low Emission Zone");
        let b = with_subject("b", "City widens emission zone", 9, "low emission zone");
        assert!(ExactMatcher.matches(&a, &b));
    }

    #[test]
    fn test_exact_subject_on_one_side_falls_back_to_title() {
        let a = with_subject("a", "Congestion charge expanded", 1, "London congestion charge");
        let b = record("b", "Congestion charge expanded", 1);
        assert!(ExactMatcher.matches(&a, &b));
        assert!(ExactMatcher.matches(&b, &a));

        let later = record("c", "Congestion charge expanded", 2);
        assert!(!ExactMatcher.matches(&a, &later));
    }

    #[test]
    fn test_exact_differing_subjects_do_not_match() {
        let a = with_subject("a", "Congestion charge expanded", 1, "London congestion charge");
        let b = with_subject("b", "Congestion charge expanded", 1, "Stockholm congestion tax");
        assert!(!ExactMatcher.matches(&a, &b));
    }

    #[test]
    fn test_fuzzy_follows_subject_rule() {
        let matcher = FuzzyMatcher::new(0.6);
        let a = with_subject("a", "City approves new tram line", 3, "Tram extension");
        let b = record("b", "City approves tram line", 3);
        assert!(matcher.matches(&a, &b));

        let c = with_subject("c", "City approves new tram line", 3, "Bus depot");
        assert!(!matcher.matches(&a, &c));

        let d = with_subject("d", "Unrelated headline", 20, "tram EXTENSION");
        assert!(matcher.matches(&a, &d));
    }

    #[test]
    fn test_fuzzy_similar_titles() {
        let matcher = FuzzyMatcher::new(0.6);
        let a = record("a", "City approves new tram line", 3);
        let b = record("b", "City approves tram line", 3);
        assert!(matcher.matches(&a, &b));
        assert!(matcher.matches(&b, &a));

        let c = record("c", "City approves tram line", 4);
        assert!(!matcher.matches(&a, &c));
    }

    #[test]
    fn test_title_similarity() {
        assert_eq!(title_similarity("a b", "a b"), 1.0);
        assert_eq!(title_similarity("a b", "c d"), 0.0);
        assert_eq!(title_similarity("a b c", "a b d"), 0.5);
        assert_eq!(title_similarity("", "!!"), 0.0);
    }

    #[test]
    fn test_matching_config() {
        let config = MatchingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.matcher().name(), "exact");

        let config: MatchingConfig =
            toml::from_str("strategy = \"fuzzy\"\nsimilarity_threshold = 0.5").unwrap();
        assert_eq!(config.strategy, MatchStrategy::Fuzzy);
        assert_eq!(config.matcher().name(), "fuzzy");

        let config = MatchingConfig {
            similarity_threshold: 0.0,
            ..MatchingConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
