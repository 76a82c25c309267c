//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the collection core and its
//! collaborators. Implementations live in other crates.

use crate::{RawRecord, Source, SourceCatalog, SourceKey, ValidatedRecord};
use std::collections::HashMap;
use std::future::Future;

/// Trait for fetching raw records from a source
///
/// Implemented by the infrastructure layer (waypoint-fetch). Timeouts and
/// retries are the implementation's concern; the pipeline treats an error as
/// "zero records from that source".
pub trait RecordFetcher: Send + Sync {
    /// Error type for fetch operations
    type Error: std::fmt::Display + Send;

    /// Fetch all records currently offered by a source
    fn fetch(
        &self,
        source: &Source,
    ) -> impl Future<Output = Result<Vec<RawRecord>, Self::Error>> + Send;
}

/// Strategy deciding whether two records describe the same fact
///
/// Implemented by the application layer (waypoint-corroborator).
/// Implementations must be deterministic and symmetric:
/// `matches(a, b) == matches(b, a)`.
pub trait FactMatcher: Send + Sync {
    /// Strategy name for logging
    fn name(&self) -> &'static str;

    /// Whether both records describe the same fact
    fn matches(&self, a: &ValidatedRecord, b: &ValidatedRecord) -> bool;
}

/// Resolves a source key to its configured source
pub trait SourceLookup {
    /// Look up a source
    fn lookup(&self, key: &SourceKey) -> Option<&Source>;
}

impl SourceLookup for SourceCatalog {
    fn lookup(&self, key: &SourceKey) -> Option<&Source> {
        self.get(key)
    }
}

impl SourceLookup for HashMap<SourceKey, Source> {
    fn lookup(&self, key: &SourceKey) -> Option<&Source> {
        self.get(key)
    }
}
