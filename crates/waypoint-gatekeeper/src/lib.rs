//! Waypoint Gatekeeper
//!
//! Quality control at both ends of the collection pipeline.
//!
//! The Gatekeeper provides:
//! - Record validation (required fields, date format and range, content length)
//! - Fact acceptance (minimum distinct sources, confidence floor)
//! - Rejection reasons for every record and fact kept out, for diagnostics
//!
//! # Examples
//!
//! ```
//! use waypoint_gatekeeper::{AcceptanceGate, FieldValidator, ValidationConfig};
//! use waypoint_domain::{RawRecord, SourceCategory, SourceKey};
//!
//! let config = ValidationConfig::default();
//! let validator = FieldValidator::new(config.clone()).unwrap();
//! let gate = AcceptanceGate::from_config(&config).unwrap();
//!
//! let raw = RawRecord::new(SourceKey::new(SourceCategory::News, "Transport Times"))
//!     .with_field("title", "Bus franchising begins")
//!     .with_field("source", "Transport Times")
//!     .with_field("date", "2024-09-01")
//!     .with_field("content", "The first franchised routes started today.");
//! assert!(validator.validate(raw).is_ok());
//! assert_eq!(gate.min_sources(), 3);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod gate;
mod validator;

pub use config::{ValidationConfig, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_MIN_SOURCES};
pub use error::GatekeeperError;
pub use gate::{AcceptanceGate, GateOutcome, GateRejection, RejectedFact};
pub use validator::{parse_record_date, FieldValidator, RecordRejection, RejectedRecord};
