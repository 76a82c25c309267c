//! Waypoint Fetch Layer
//!
//! Record fetcher implementations.
//!
//! # Architecture
//!
//! This crate provides implementations of the `RecordFetcher` trait from
//! `waypoint-domain`. Retries and timeouts are handled here; the pipeline
//! only sees records or an error per source.
//!
//! # Fetchers
//!
//! - `MockFetcher`: Deterministic canned records for testing
//! - `HttpFetcher`: JSON endpoints over HTTP
//!
//! # Examples
//!
//! ```
//! use waypoint_fetch::MockFetcher;
//! use waypoint_domain::traits::RecordFetcher;
//! use waypoint_domain::{RawRecord, Source, SourceCategory};
//!
//! let source = Source::new("Transit Journal", "https://example.org", SourceCategory::Academic, 1);
//! let fetcher = MockFetcher::new()
//!     .with_records(source.key(), vec![RawRecord::new(source.key())]);
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let records = fetcher.fetch(&source).await.unwrap();
//! assert_eq!(records.len(), 1);
//! # });
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod http;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use waypoint_domain::traits::RecordFetcher;
use waypoint_domain::{RawRecord, Source, SourceKey};

pub use config::FetchConfig;
pub use http::HttpFetcher;

/// Errors that can occur while fetching from a source
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Network communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Endpoint answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status {
        /// Status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// Body could not be turned into records
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// HTTP client could not be constructed
    #[error("Client build error: {0}")]
    ClientBuild(String),
}

#[derive(Debug, Clone)]
enum CannedResponse {
    Records(Vec<RawRecord>),
    Failure(String),
}

/// Mock fetcher for deterministic testing
///
/// Returns pre-configured records or failures per source without any network
/// calls. Sources without a canned response yield no records.
///
/// # Examples
///
/// ```
/// use waypoint_fetch::{FetchError, MockFetcher};
/// use waypoint_domain::traits::RecordFetcher;
/// use waypoint_domain::{Source, SourceCategory};
///
/// let source = Source::new("Metro News", "https://example.org", SourceCategory::News, 2);
/// let fetcher = MockFetcher::new().with_failure(source.key(), "connection reset");
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let result = fetcher.fetch(&source).await;
/// assert!(matches!(result, Err(FetchError::Communication(_))));
/// assert_eq!(fetcher.call_count(), 1);
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    responses: HashMap<SourceKey, CannedResponse>,
    delays: HashMap<SourceKey, Duration>,
    call_count: Arc<AtomicUsize>,
}

impl MockFetcher {
    /// Create a mock with no canned responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Return these records for a source
    pub fn with_records(mut self, source: SourceKey, records: Vec<RawRecord>) -> Self {
        self.responses
            .insert(source, CannedResponse::Records(records));
        self
    }

    /// Fail every fetch of a source
    pub fn with_failure(mut self, source: SourceKey, message: impl Into<String>) -> Self {
        self.responses
            .insert(source, CannedResponse::Failure(message.into()));
        self
    }

    /// Delay the response for a source
    pub fn with_delay(mut self, source: SourceKey, delay: Duration) -> Self {
        self.delays.insert(source, delay);
        self
    }

    /// Number of fetch calls so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
    }
}

impl RecordFetcher for MockFetcher {
    type Error = FetchError;

    async fn fetch(&self, source: &Source) -> Result<Vec<RawRecord>, Self::Error> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        let key = source.key();
        if let Some(delay) = self.delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }

        match self.responses.get(&key) {
            Some(CannedResponse::Records(records)) => Ok(records.clone()),
            Some(CannedResponse::Failure(message)) => {
                Err(FetchError::Communication(message.clone()))
            }
            None => Ok(Vec::new()),
        }
    }
}
