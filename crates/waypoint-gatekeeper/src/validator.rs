//! Record validation logic

use crate::{GatekeeperError, ValidationConfig};
use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use waypoint_domain::record::{FIELD_CONTENT, FIELD_DATE, FIELD_TITLE};
use waypoint_domain::{RawRecord, SourceKey, ValidatedRecord};

/// Date layouts accepted besides RFC 3339 timestamps
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d-%m-%Y"];

/// Reasons a raw record is rejected
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RecordRejection {
    /// A required field is absent, null, empty or whitespace-only
    MissingField {
        /// Name of the missing field
        field: String,
    },

    /// The date field does not parse as a calendar date
    MalformedDate {
        /// The offending value
        value: String,
    },

    /// The date parses but lies outside the configured year range
    DateOutOfRange {
        /// The parsed date
        date: NaiveDate,
    },

    /// The content is shorter than the configured minimum
    ContentTooShort {
        /// Trimmed content length in characters
        length: usize,
        /// Required minimum
        minimum: usize,
    },

    /// The record names a source missing from the catalog
    UnknownSource,
}

impl RecordRejection {
    /// Stable reason code
    pub fn code(&self) -> &'static str {
        match self {
            RecordRejection::MissingField { .. } => "missing_field",
            RecordRejection::MalformedDate { .. } => "malformed_date",
            RecordRejection::DateOutOfRange { .. } => "date_out_of_range",
            RecordRejection::ContentTooShort { .. } => "content_too_short",
            RecordRejection::UnknownSource => "unknown_source",
        }
    }
}

impl fmt::Display for RecordRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordRejection::MissingField { field } => write!(f, "missing field '{}'", field),
            RecordRejection::MalformedDate { value } => write!(f, "malformed date '{}'", value),
            RecordRejection::DateOutOfRange { date } => write!(f, "date {} out of range", date),
            RecordRejection::ContentTooShort { length, minimum } => {
                write!(f, "content too short ({} < {} chars)", length, minimum)
            }
            RecordRejection::UnknownSource => write!(f, "unknown source"),
        }
    }
}

/// A raw record that failed validation, kept for diagnostics
///
/// Ordered by source, then title, then reason.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RejectedRecord {
    /// Source that produced the record
    pub source: SourceKey,

    /// Title, when the record had one
    pub title: Option<String>,

    /// Why the record was rejected
    #[serde(flatten)]
    pub reason: RecordRejection,
}

impl RejectedRecord {
    /// Rejection for a record whose source is not in the catalog
    pub fn unknown_source(raw: &RawRecord) -> Self {
        reject(raw, RecordRejection::UnknownSource)
    }
}

/// Parse a record date
///
/// Accepts `YYYY-MM-DD`, `DD-MM-YYYY` and RFC 3339 timestamps. Calendar-invalid
/// dates such as 31 November do not parse.
pub fn parse_record_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Checks raw records against the required-field policy
///
/// Validation is pure: no I/O, and malformed input is reported through the
/// returned rejection rather than an error.
#[derive(Debug, Clone)]
pub struct FieldValidator {
    config: ValidationConfig,
}

impl FieldValidator {
    /// Create a new validator with the given configuration
    pub fn new(config: ValidationConfig) -> Result<Self, GatekeeperError> {
        config.validate().map_err(GatekeeperError::Config)?;
        Ok(Self { config })
    }

    /// Create a validator with default configuration
    pub fn default_config() -> Self {
        Self {
            config: ValidationConfig::default(),
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a raw record
    ///
    /// Checks run in a fixed order and the first failure is reported:
    /// 1. Required fields, in configured order
    /// 2. Date format
    /// 3. Date range (if configured)
    /// 4. Content length (if configured)
    pub fn validate(&self, raw: RawRecord) -> Result<ValidatedRecord, RejectedRecord> {
        let date = self.check(&raw).map_err(|reason| reject(&raw, reason))?;
        ValidatedRecord::new(raw, date).map_err(|incomplete| {
            reject(
                &incomplete.raw,
                RecordRejection::MissingField {
                    field: incomplete.field.to_string(),
                },
            )
        })
    }

    /// Run every check, returning the parsed date on success
    fn check(&self, raw: &RawRecord) -> Result<NaiveDate, RecordRejection> {
        // 1. Required fields
        if let Some(field) = self
            .config
            .required_fields
            .iter()
            .find(|field| !raw.has_value(field))
        {
            return Err(RecordRejection::MissingField {
                field: field.clone(),
            });
        }

        // 2. Date format
        let value = raw.text(FIELD_DATE).unwrap_or_default();
        let date = parse_record_date(&value).ok_or(RecordRejection::MalformedDate { value })?;

        // 3. Date range
        let year = date.year();
        let too_early = self.config.earliest_year.is_some_and(|y| year < y);
        let too_late = self.config.latest_year.is_some_and(|y| year > y);
        if too_early || too_late {
            return Err(RecordRejection::DateOutOfRange { date });
        }

        // 4. Content length
        if self.config.min_content_length > 0 {
            let length = raw
                .text(FIELD_CONTENT)
                .map(|c| c.chars().count())
                .unwrap_or(0);
            if length < self.config.min_content_length {
                return Err(RecordRejection::ContentTooShort {
                    length,
                    minimum: self.config.min_content_length,
                });
            }
        }

        Ok(date)
    }
}

fn reject(raw: &RawRecord, reason: RecordRejection) -> RejectedRecord {
    tracing::debug!("Rejected record from {}: {}", raw.source, reason);
    RejectedRecord {
        source: raw.source.clone(),
        title: raw.text(FIELD_TITLE),
        reason,
    }
}
