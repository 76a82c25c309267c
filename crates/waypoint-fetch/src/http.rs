//! HTTP fetcher
//!
//! Fetches records from JSON endpoints.
//!
//! # Features
//!
//! - Configurable User-Agent and per-request timeout
//! - Retry logic with exponential backoff
//! - Optional politeness delay after each successful request
//!
//! # Response format
//!
//! The body must be JSON: either an array of objects, or an object holding
//! such an array under `records`, `items` or `data`. Entries that are not
//! objects are skipped.
//!
//! # Examples
//!
//! ```no_run
//! use waypoint_fetch::{FetchConfig, HttpFetcher};
//!
//! let fetcher = HttpFetcher::new(&FetchConfig::default()).unwrap();
//! ```

use crate::{FetchConfig, FetchError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde_json::Value;
use std::time::Duration;
use waypoint_domain::record::FIELD_SOURCE;
use waypoint_domain::traits::RecordFetcher;
use waypoint_domain::{RawRecord, Source};

/// Keys under which an object body may carry its records
const ENVELOPE_KEYS: [&str; 3] = ["records", "items", "data"];

/// Delay before the first retry; doubles on every further attempt
const BASE_BACKOFF: Duration = Duration::from_secs(1);

/// Longest wait between two attempts
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Fetcher for sources serving JSON over HTTP
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    max_retries: u32,
    request_delay: Duration,
    backoff: Duration,
}

impl HttpFetcher {
    /// Create a new HTTP fetcher
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the HTTP client cannot be
    /// constructed (for example an invalid User-Agent).
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            max_retries: config.max_retries.max(1),
            request_delay: Duration::from_millis(config.request_delay_ms),
            backoff: BASE_BACKOFF,
        })
    }

    /// Set the maximum number of attempts per source
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Set the delay before the first retry
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Fetch and parse the records offered by a source
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The endpoint cannot be reached after all attempts
    /// - The endpoint answers with a client error status
    /// - The body is not one of the accepted JSON shapes
    pub async fn fetch_source(&self, source: &Source) -> Result<Vec<RawRecord>, FetchError> {
        let body = self.get_with_retry(source).await?;
        let records = parse_body(source, body)?;

        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        tracing::debug!("Fetched {} records from {}", records.len(), source.key());
        Ok(records)
    }

    async fn get_with_retry(&self, source: &Source) -> Result<Value, FetchError> {
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.client.get(&source.base_url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.json::<Value>().await.map_err(|e| {
                            FetchError::InvalidResponse(format!("Failed to parse body: {}", e))
                        });
                    } else if status.is_client_error()
                        && status != reqwest::StatusCode::TOO_MANY_REQUESTS
                    {
                        return Err(FetchError::Status {
                            status: status.as_u16(),
                            url: source.base_url.clone(),
                        });
                    } else {
                        last_error = Some(FetchError::Status {
                            status: status.as_u16(),
                            url: source.base_url.clone(),
                        });
                    }
                }
                Err(e) => {
                    last_error = Some(FetchError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                let delay = self.backoff_delay(attempts);
                tracing::warn!(
                    "Attempt {}/{} for {} failed, retrying in {:?}",
                    attempts,
                    self.max_retries,
                    source.key(),
                    delay
                );
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| FetchError::Communication("Max retries exceeded".to_string())))
    }
}

impl HttpFetcher {
    /// Wait after the given failed attempt (1-based): 1s, 2s, 4s, ... up to a minute
    fn backoff_delay(&self, attempt: u32) -> Duration {
        2u32.checked_pow(attempt.saturating_sub(1))
            .map_or(MAX_BACKOFF, |factor| self.backoff.saturating_mul(factor))
            .min(MAX_BACKOFF)
    }
}

impl RecordFetcher for HttpFetcher {
    type Error = FetchError;

    async fn fetch(&self, source: &Source) -> Result<Vec<RawRecord>, Self::Error> {
        self.fetch_source(source).await
    }
}

/// Turn a response body into raw records tagged with the source key
///
/// Records without a `source` field get the source's name.
pub(crate) fn parse_body(source: &Source, body: Value) -> Result<Vec<RawRecord>, FetchError> {
    let entries = match body {
        Value::Array(entries) => entries,
        Value::Object(mut object) => ENVELOPE_KEYS
            .iter()
            .find_map(|key| match object.remove(*key) {
                Some(Value::Array(entries)) => Some(entries),
                _ => None,
            })
            .ok_or_else(|| {
                FetchError::InvalidResponse(format!(
                    "Expected an array under one of {:?}",
                    ENVELOPE_KEYS
                ))
            })?,
        other => {
            return Err(FetchError::InvalidResponse(format!(
                "Expected a JSON array or object, got {}",
                json_kind(&other)
            )))
        }
    };

    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let fields = match entry {
            Value::Object(fields) => fields,
            other => {
                tracing::warn!(
                    "Skipping entry {} from {}: not an object ({})",
                    index,
                    source.key(),
                    json_kind(&other)
                );
                continue;
            }
        };

        let mut record = RawRecord::new(source.key());
        record.fields.extend(fields);
        if !record.has_value(FIELD_SOURCE) {
            record
                .fields
                .insert(FIELD_SOURCE.to_string(), Value::String(source.name.clone()));
        }
        records.push(record);
    }
    Ok(records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
