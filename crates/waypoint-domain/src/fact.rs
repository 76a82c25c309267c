//! Fact module - equivalence classes of corroborating records

use crate::{Confidence, SourceCategory, SourceKey, ValidatedRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Namespace for deterministic fact identifiers
const FACT_NAMESPACE: Uuid = Uuid::from_u128(0x6b1f_43c2_9d0e_4a57_b2c8_1e7d_5a90_3f64);

/// Normalize free text for matching
///
/// Lowercases, replaces anything that is not alphanumeric with a space and
/// collapses whitespace.
pub fn normalize_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Canonical key derived from a record's semantic content
///
/// An explicit `subject` field wins; otherwise the normalized title plus the
/// publication date is used. The key names and orders facts. Deciding whether
/// two records corroborate each other is the matcher's job.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactKey(String);

impl FactKey {
    /// Derive the key of a record
    pub fn of(record: &ValidatedRecord) -> Self {
        match record.subject_key() {
            Some(subject) => Self(format!("subject:{}", subject)),
            None => Self(format!(
                "title:{}@{}",
                record.title_key(),
                record.date().format("%Y-%m-%d")
            )),
        }
    }

    /// Key as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Records judged to describe the same underlying information
///
/// A fact always has at least one supporting record. Records are kept in a
/// canonical order (date, source, title, content) so that two facts built
/// from the same records compare equal regardless of input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Fact {
    id: Uuid,
    key: FactKey,
    records: Vec<ValidatedRecord>,
}

impl Fact {
    /// Build a fact from its supporting records, `None` if there are none
    pub fn from_records(mut records: Vec<ValidatedRecord>) -> Option<Self> {
        records.sort_by(ValidatedRecord::canonical_cmp);
        let key = records.iter().map(FactKey::of).min()?;
        let id = Uuid::new_v5(&FACT_NAMESPACE, key.as_str().as_bytes());

        Some(Self { id, key, records })
    }

    /// Deterministic identifier derived from the canonical key
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Canonical key (smallest member key)
    pub fn key(&self) -> &FactKey {
        &self.key
    }

    /// Supporting records in canonical order
    pub fn records(&self) -> &[ValidatedRecord] {
        &self.records
    }

    /// Distinct contributing sources
    pub fn sources(&self) -> BTreeSet<&SourceKey> {
        self.records.iter().map(|r| r.source()).collect()
    }

    /// Number of distinct contributing sources
    ///
    /// Several records from one source count once.
    pub fn distinct_sources(&self) -> usize {
        self.sources().len()
    }

    /// Categories the contributing sources belong to
    pub fn categories(&self) -> BTreeSet<SourceCategory> {
        self.records.iter().map(|r| r.source().category).collect()
    }

    /// Date of the earliest supporting record
    pub fn earliest_date(&self) -> NaiveDate {
        // records are sorted by date and never empty
        self.records[0].date()
    }
}

/// A fact with its computed confidence
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredFact {
    /// The scored fact
    pub fact: Fact,

    /// Confidence in [0, 1]
    pub confidence: Confidence,

    /// Most trusted contributing source
    pub lead_source: SourceKey,
}

impl ScoredFact {
    /// Number of distinct contributing sources
    pub fn distinct_sources(&self) -> usize {
        self.fact.distinct_sources()
    }

    /// Record representing the fact: earliest record of the lead source
    pub fn representative(&self) -> &ValidatedRecord {
        let records = self.fact.records();
        records
            .iter()
            .find(|r| r.source() == &self.lead_source)
            .unwrap_or(&records[0])
    }
}

/// Final output of the pipeline for an accepted fact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptedRecord {
    /// Deterministic fact identifier
    pub fact_id: Uuid,

    /// Canonical fact key
    pub fact_key: FactKey,

    /// Title of the representative record
    pub title: String,

    /// Publisher of the representative record
    pub publisher: String,

    /// Earliest publication date among supporting records
    pub date: NaiveDate,

    /// Content of the representative record
    pub content: String,

    /// Confidence in [0, 1]
    pub confidence: f64,

    /// Number of distinct corroborating sources
    pub distinct_sources: usize,

    /// Corroborating sources
    pub sources: Vec<SourceKey>,

    /// Categories of the corroborating sources
    pub categories: Vec<SourceCategory>,

    /// Number of supporting records, duplicates included
    pub supporting_records: usize,
}

impl From<&ScoredFact> for AcceptedRecord {
    fn from(scored: &ScoredFact) -> Self {
        let fact = &scored.fact;
        let representative = scored.representative();

        Self {
            fact_id: fact.id(),
            fact_key: fact.key().clone(),
            title: representative.title().to_string(),
            publisher: representative.publisher().to_string(),
            date: fact.earliest_date(),
            content: representative.content().to_string(),
            confidence: scored.confidence.value(),
            distinct_sources: fact.distinct_sources(),
            sources: fact.sources().into_iter().cloned().collect(),
            categories: fact.categories().into_iter().collect(),
            supporting_records: fact.records().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawRecord;

    fn record(source: &str, title: &str, date: (i32, u32, u32)) -> ValidatedRecord {
        let raw = RawRecord::new(SourceKey::new(SourceCategory::News, source))
            .with_field("title", title)
            .with_field("source", source)
            .with_field("date", "unused")
            .with_field("content", "Body text");
        let date = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        ValidatedRecord::new(raw, date).unwrap()
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Low-Emission  Zones!  "), "low emission zones");
        assert_eq!(normalize_text("ULEZ: Phase 2"), "ulez phase 2");
    }

    #[test]
    fn test_fact_key_prefers_subject() {
        let with_subject = {
            let raw = RawRecord::new(SourceKey::new(SourceCategory::News, "a"))
                .with_field("title", "Anything")
                .with_field("source", "a")
                .with_field("date", "2024-01-01")
                .with_field("content", "Body")
                .with_field("subject", "London ULEZ expansion");
            ValidatedRecord::new(raw, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).unwrap()
        };
        assert_eq!(FactKey::of(&with_subject).as_str(), "subject:london ulez expansion");

        let plain = record("b", "Bus Lanes", (2024, 1, 2));
        assert_eq!(FactKey::of(&plain).as_str(), "title:bus lanes@2024-01-02");
    }

    #[test]
    fn test_empty_fact_is_none() {
        assert!(Fact::from_records(Vec::new()).is_none());
    }

    #[test]
    fn test_duplicate_source_counts_once() {
        let fact = Fact::from_records(vec![
            record("a", "Bus lanes", (2024, 1, 2)),
            record("a", "Bus lanes", (2024, 1, 2)),
            record("b", "Bus lanes", (2024, 1, 2)),
        ])
        .unwrap();
        assert_eq!(fact.records().len(), 3);
        assert_eq!(fact.distinct_sources(), 2);
    }

    #[test]
    fn test_fact_identity_is_order_independent() {
        let a = record("a", "Bus lanes", (2024, 1, 3));
        let b = record("b", "Bus lanes", (2024, 1, 2));
        let f1 = Fact::from_records(vec![a.clone(), b.clone()]).unwrap();
        let f2 = Fact::from_records(vec![b, a]).unwrap();
        assert_eq!(f1, f2);
        assert_eq!(f1.id(), f2.id());
        assert_eq!(f1.earliest_date(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }
}
