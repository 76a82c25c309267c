//! Waypoint Domain Layer
//!
//! This crate contains the data model of the transport-policy collection
//! pipeline. Sources and records are plain immutable values; nothing in this
//! crate performs I/O.
//!
//! ## Key Concepts
//!
//! - **Source**: A configured origin (name, URL, category, priority)
//! - **RawRecord**: Untyped fields as returned by a fetch collaborator
//! - **ValidatedRecord**: A record guaranteed to carry title, source, date and content
//! - **Fact**: Records from one or more sources describing the same information
//! - **Confidence**: A [0, 1] score combining corroboration breadth and source trust
//!
//! ## Architecture
//!
//! - Pure data and pure functions only
//! - Collaborator boundaries (fetching, matching) are traits in [`traits`]
//! - Validation, aggregation and orchestration live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod confidence;
pub mod confidence_computation;
pub mod fact;
pub mod record;
pub mod source;
pub mod traits;

// Re-exports for convenience
pub use catalog::{CatalogError, SourceCatalog};
pub use confidence::Confidence;
pub use confidence_computation::{ConfidenceScorer, ScoringConfig, ScoringError};
pub use fact::{AcceptedRecord, Fact, FactKey, ScoredFact};
pub use record::{IncompleteRecord, RawRecord, ValidatedRecord};
pub use source::{Source, SourceCategory, SourceKey};
