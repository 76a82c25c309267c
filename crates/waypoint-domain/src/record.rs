//! Record module - raw collaborator output and validated records

use crate::fact::normalize_text;
use crate::SourceKey;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use thiserror::Error;

/// Title field name
pub const FIELD_TITLE: &str = "title";
/// Publisher field name
pub const FIELD_SOURCE: &str = "source";
/// Publication date field name
pub const FIELD_DATE: &str = "date";
/// Body text field name
pub const FIELD_CONTENT: &str = "content";
/// Optional explicit subject used as a matching key
pub const FIELD_SUBJECT: &str = "subject";

/// Fields every validated record is guaranteed to carry
pub const CORE_FIELDS: [&str; 4] = [FIELD_TITLE, FIELD_SOURCE, FIELD_DATE, FIELD_CONTENT];

/// A record as produced by a fetch collaborator
///
/// Field values are untyped at this layer. Created once per fetch call and
/// consumed once by the field validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Source that produced the record (lookup only)
    pub source: SourceKey,

    /// Field name to value
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl RawRecord {
    /// Create an empty record for a source
    pub fn new(source: SourceKey) -> Self {
        Self {
            source,
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Textual value of a field, `None` if absent, null, empty or whitespace-only
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields.get(name).and_then(value_text)
    }

    /// Whether a field carries a non-blank value
    pub fn has_value(&self, name: &str) -> bool {
        self.text(name).is_some()
    }
}

/// Render a field value as trimmed text, treating blanks as missing
pub fn value_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) if items.is_empty() => return None,
        Value::Object(map) if map.is_empty() => return None,
        other => other.to_string(),
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// A raw record that lacks a core field
#[derive(Debug, Clone, PartialEq, Error)]
#[error("record from {} is missing field '{field}'", .raw.source)]
pub struct IncompleteRecord {
    /// The record, unchanged
    pub raw: RawRecord,

    /// First missing core field
    pub field: &'static str,
}

/// A record guaranteed to carry non-empty title, source, date and content
///
/// Only constructible through [`ValidatedRecord::new`], which re-checks the
/// core fields, so an incomplete raw record can never become a validated one.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord {
    source: SourceKey,
    title: String,
    publisher: String,
    date: NaiveDate,
    content: String,
    fields: BTreeMap<String, Value>,
    // matching keys, normalized once at construction
    subject_key: Option<String>,
    title_key: String,
}

impl ValidatedRecord {
    /// Promote a raw record whose date has already been parsed
    ///
    /// On failure the raw record is handed back along with the first missing
    /// core field.
    pub fn new(raw: RawRecord, date: NaiveDate) -> Result<Self, IncompleteRecord> {
        let (title, publisher, content) = match (
            raw.text(FIELD_TITLE),
            raw.text(FIELD_SOURCE),
            raw.has_value(FIELD_DATE),
            raw.text(FIELD_CONTENT),
        ) {
            (None, ..) => return Err(IncompleteRecord { raw, field: FIELD_TITLE }),
            (_, None, ..) => return Err(IncompleteRecord { raw, field: FIELD_SOURCE }),
            (_, _, false, _) => return Err(IncompleteRecord { raw, field: FIELD_DATE }),
            (_, _, _, None) => return Err(IncompleteRecord { raw, field: FIELD_CONTENT }),
            (Some(title), Some(publisher), true, Some(content)) => (title, publisher, content),
        };
        let subject_key = raw
            .text(FIELD_SUBJECT)
            .map(|s| normalize_text(&s))
            .filter(|s| !s.is_empty());
        let title_key = normalize_text(&title);

        Ok(Self {
            source: raw.source,
            title,
            publisher,
            date,
            content,
            fields: raw.fields,
            subject_key,
            title_key,
        })
    }

    /// Source that produced the record
    pub fn source(&self) -> &SourceKey {
        &self.source
    }

    /// Trimmed title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Publisher as stated in the record's `source` field
    pub fn publisher(&self) -> &str {
        &self.publisher
    }

    /// Parsed publication date
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Trimmed body text
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Textual value of any field
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields.get(name).and_then(value_text)
    }

    /// All fields as received
    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    /// Normalized `subject` field, if the record carries a non-blank one
    pub fn subject_key(&self) -> Option<&str> {
        self.subject_key.as_deref()
    }

    /// Normalized title
    pub fn title_key(&self) -> &str {
        &self.title_key
    }

    /// Total order used to canonicalize record sequences
    ///
    /// Date first, then source, title and content; remaining fields break
    /// ties by their JSON text.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        (self.date, &self.source, &self.title, &self.content)
            .cmp(&(other.date, &other.source, &other.title, &other.content))
            .then_with(|| {
                let ours = self.fields.iter().map(|(k, v)| (k, v.to_string()));
                let theirs = other.fields.iter().map(|(k, v)| (k, v.to_string()));
                ours.cmp(theirs)
            })
    }
}
