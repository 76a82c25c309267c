//! Corroboration aggregation
//!
//! Partitions validated records into facts: the connected components of the
//! matcher's "same fact" relation. Components do not depend on the order in
//! which records arrive, and records are canonicalized before grouping, so
//! any permutation of a batch yields the same facts.

use std::collections::BTreeMap;
use waypoint_domain::traits::FactMatcher;
use waypoint_domain::{Fact, ValidatedRecord};

/// Groups validated records describing the same fact across sources
#[derive(Debug, Clone)]
pub struct CorroborationAggregator<M> {
    matcher: M,
}

impl<M: FactMatcher> CorroborationAggregator<M> {
    /// Create an aggregator around a matching strategy
    pub fn new(matcher: M) -> Self {
        Self { matcher }
    }

    /// Matching strategy in use
    pub fn matcher(&self) -> &M {
        &self.matcher
    }

    /// Partition records into facts, ordered by fact key
    pub fn aggregate(&self, mut records: Vec<ValidatedRecord>) -> Vec<Fact> {
        if records.is_empty() {
            return Vec::new();
        }

        // 1. Canonical order so group membership lists are stable
        records.sort_by(ValidatedRecord::canonical_cmp);

        // 2. Union every matching pair
        let mut sets = DisjointSet::new(records.len());
        for i in 0..records.len() {
            for j in (i + 1)..records.len() {
                if sets.find(i) != sets.find(j) && self.matcher.matches(&records[i], &records[j])
                {
                    sets.union(i, j);
                }
            }
        }

        // 3. Collect components
        let mut groups: BTreeMap<usize, Vec<ValidatedRecord>> = BTreeMap::new();
        for (i, record) in records.into_iter().enumerate() {
            groups.entry(sets.find(i)).or_default().push(record);
        }

        let mut facts: Vec<Fact> = groups
            .into_values()
            .filter_map(Fact::from_records)
            .collect();
        facts.sort_by(|a, b| {
            a.key()
                .cmp(b.key())
                .then_with(|| a.records()[0].canonical_cmp(&b.records()[0]))
        });

        tracing::debug!(
            "Aggregated records into {} facts using {} matching",
            facts.len(),
            self.matcher.name()
        );
        facts
    }
}

/// Union-find over record indices
///
/// The root of every set is its smallest index.
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            self.parent[node] = self.parent[self.parent[node]];
            node = self.parent[node];
        }
        node
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            let (low, high) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[high] = low;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExactMatcher, FuzzyMatcher};
    use chrono::NaiveDate;
    use waypoint_domain::{RawRecord, SourceCategory, SourceKey};

    fn record(category: SourceCategory, source: &str, title: &str, day: u32) -> ValidatedRecord {
        let raw = RawRecord::new(SourceKey::new(category, source))
            .with_field("title", title)
            .with_field("source", source)
            .with_field("date", "ignored")
            .with_field("content", format!("{} reported by {}", title, source));
        ValidatedRecord::new(raw, NaiveDate::from_ymd_opt(2024, 3, day).unwrap()).unwrap()
    }

    #[test]
    fn test_empty_batch() {
        let aggregator = CorroborationAggregator::new(ExactMatcher);
        assert!(aggregator.aggregate(Vec::new()).is_empty());
    }

    #[test]
    fn test_groups_across_sources() {
        let aggregator = CorroborationAggregator::new(ExactMatcher);
        let facts = aggregator.aggregate(vec![
            record(SourceCategory::Academic, "Journal", "Fare freeze extended", 5),
            record(SourceCategory::News, "Daily", "Fare Freeze Extended", 5),
            record(SourceCategory::Industry, "Operators", "fare freeze extended!", 5),
            record(SourceCategory::News, "Daily", "Rail strike called off", 6),
        ]);

        assert_eq!(facts.len(), 2);
        let fare = facts
            .iter()
            .find(|f| f.key().as_str().contains("fare"))
            .unwrap();
        assert_eq!(fare.distinct_sources(), 3);
        assert_eq!(fare.categories().len(), 3);
    }

    #[test]
    fn test_duplicates_from_one_source_count_once() {
        let aggregator = CorroborationAggregator::new(ExactMatcher);
        let facts = aggregator.aggregate(vec![
            record(SourceCategory::News, "Daily", "Bus lane review", 2),
            record(SourceCategory::News, "Daily", "Bus lane review", 2),
            record(SourceCategory::News, "Daily", "Bus lane review", 2),
        ]);
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].records().len(), 3);
        assert_eq!(facts[0].distinct_sources(), 1);
    }

    #[test]
    fn test_same_name_in_different_categories_are_distinct() {
        let aggregator = CorroborationAggregator::new(ExactMatcher);
        let facts = aggregator.aggregate(vec![
            record(SourceCategory::News, "Transit Weekly", "Ferry contract", 2),
            record(SourceCategory::Industry, "Transit Weekly", "Ferry contract", 2),
        ]);
        assert_eq!(facts[0].distinct_sources(), 2);
    }

    #[test]
    fn test_subject_on_one_record_still_corroborates() {
        let aggregator = CorroborationAggregator::new(ExactMatcher);
        let raw = RawRecord::new(SourceKey::new(SourceCategory::News, "Metro Daily"))
            .with_field("title", "Congestion charge expanded")
            .with_field("source", "Metro Daily")
            .with_field("date", "ignored")
            .with_field("content", "The zone grows in June.")
            .with_field("subject", "London congestion charge");
        let tagged = ValidatedRecord::new(raw, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()).unwrap();

        let facts = aggregator.aggregate(vec![
            tagged,
            record(SourceCategory::News, "City Wire", "Congestion charge expanded", 1),
        ]);
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].distinct_sources(), 2);
        assert_eq!(facts[0].key().as_str(), "subject:london congestion charge");
    }

    #[test]
    fn test_fuzzy_is_transitive_through_components() {
        let aggregator = CorroborationAggregator::new(FuzzyMatcher::new(0.5));
        let facts = aggregator.aggregate(vec![
            record(SourceCategory::News, "a", "new tram line approved", 4),
            record(SourceCategory::News, "b", "tram line approved", 4),
            record(SourceCategory::News, "c", "tram line approved by council", 4),
        ]);
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].distinct_sources(), 3);
    }

    #[test]
    fn test_disjoint_set_roots_are_smallest() {
        let mut sets = DisjointSet::new(5);
        sets.union(4, 2);
        sets.union(2, 3);
        assert_eq!(sets.find(4), 2);
        sets.union(3, 0);
        assert_eq!(sets.find(4), 0);
        assert_eq!(sets.find(1), 1);
    }
}
