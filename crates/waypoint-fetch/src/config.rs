//! Fetch configuration

use serde::{Deserialize, Serialize};

/// Default number of sources fetched concurrently
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Default timeout for a single request (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of attempts per source
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Upper bound on attempts per source
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Default User-Agent header
pub const DEFAULT_USER_AGENT: &str = "TransportResearchBot/1.0";

/// Settings for fetching records from sources
///
/// # Examples
///
/// ```
/// use waypoint_fetch::FetchConfig;
///
/// let config = FetchConfig::default();
/// assert_eq!(config.concurrency, 4);
/// assert_eq!(config.max_retries, 3);
///
/// // One source at a time with a two second pause between requests
/// let config = FetchConfig::polite();
/// assert_eq!(config.request_delay_ms, 2000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Maximum sources fetched at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts per source before giving up
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Pause after each successful request, in milliseconds
    #[serde(default)]
    pub request_delay_ms: u64,

    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            request_delay_ms: 0,
            user_agent: default_user_agent(),
        }
    }
}

impl FetchConfig {
    /// Sequential fetching with a pause between requests
    pub fn polite() -> Self {
        Self {
            concurrency: 1,
            request_delay_ms: 2000,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.concurrency == 0 {
            return Err("concurrency must be at least 1".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be at least 1".to_string());
        }
        if self.max_retries == 0 || self.max_retries > MAX_RETRIES_LIMIT {
            return Err(format!(
                "max_retries must be between 1 and {}, got {}",
                MAX_RETRIES_LIMIT, self.max_retries
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err("user_agent must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.user_agent, "TransportResearchBot/1.0");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: FetchConfig = toml::from_str("concurrency = 8").unwrap();
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(config.request_delay_ms, 0);
    }

    #[test]
    fn test_invalid_configs() {
        let config = FetchConfig {
            concurrency: 0,
            ..FetchConfig::default()
        };
        assert!(config.validate().is_err());

        let config = FetchConfig {
            max_retries: 0,
            ..FetchConfig::default()
        };
        assert!(config.validate().is_err());

        let config = FetchConfig {
            max_retries: MAX_RETRIES_LIMIT + 1,
            ..FetchConfig::default()
        };
        assert!(config.validate().is_err());

        let config = FetchConfig {
            max_retries: MAX_RETRIES_LIMIT,
            ..FetchConfig::default()
        };
        assert!(config.validate().is_ok());

        let config = FetchConfig {
            user_agent: "  ".to_string(),
            ..FetchConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
