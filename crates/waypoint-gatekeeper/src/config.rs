//! Gatekeeper configuration

use serde::{Deserialize, Serialize};
use waypoint_domain::record::CORE_FIELDS;

/// Default minimum number of distinct corroborating sources
pub const DEFAULT_MIN_SOURCES: usize = 3;

/// Default confidence floor
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Configuration for record validation and fact acceptance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Minimum distinct sources for a fact to be accepted (inclusive)
    #[serde(default = "default_min_sources")]
    pub min_sources: usize,

    /// Minimum confidence for a fact to be accepted (inclusive)
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    /// Fields every record must carry, checked in this order
    #[serde(default = "default_required_fields")]
    pub required_fields: Vec<String>,

    /// Minimum trimmed content length in characters (0 disables the check)
    #[serde(default)]
    pub min_content_length: usize,

    /// Earliest accepted publication year
    #[serde(default)]
    pub earliest_year: Option<i32>,

    /// Latest accepted publication year
    #[serde(default)]
    pub latest_year: Option<i32>,
}

fn default_min_sources() -> usize {
    DEFAULT_MIN_SOURCES
}

fn default_confidence_threshold() -> f64 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

fn default_required_fields() -> Vec<String> {
    CORE_FIELDS.iter().map(|f| f.to_string()).collect()
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_sources: DEFAULT_MIN_SOURCES,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            required_fields: default_required_fields(),
            min_content_length: 0,
            earliest_year: None,
            latest_year: None,
        }
    }
}

impl ValidationConfig {
    /// Create a permissive configuration (any single source is enough)
    pub fn permissive() -> Self {
        Self {
            min_sources: 1,
            confidence_threshold: 0.0,
            ..Self::default()
        }
    }

    /// Create a strict configuration (content length and date range enforced)
    pub fn strict() -> Self {
        Self {
            min_sources: 3,
            confidence_threshold: 0.85,
            required_fields: default_required_fields(),
            min_content_length: 20,
            earliest_year: Some(2000),
            latest_year: Some(2100),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.min_sources == 0 {
            return Err("min_sources must be at least 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(format!(
                "confidence_threshold must be in [0, 1], got {}",
                self.confidence_threshold
            ));
        }
        for core in CORE_FIELDS {
            if !self.required_fields.iter().any(|f| f == core) {
                return Err(format!("required_fields must include '{}'", core));
            }
        }
        for (i, field) in self.required_fields.iter().enumerate() {
            if field.trim().is_empty() {
                return Err("required_fields contains an empty name".to_string());
            }
            if self.required_fields[..i].contains(field) {
                return Err(format!("required_fields lists '{}' twice", field));
            }
        }
        if let (Some(earliest), Some(latest)) = (self.earliest_year, self.latest_year) {
            if earliest > latest {
                return Err(format!(
                    "earliest_year {} is after latest_year {}",
                    earliest, latest
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ValidationConfig::default();
        assert_eq!(config.min_sources, 3);
        assert_eq!(config.confidence_threshold, 0.8);
        assert_eq!(config.required_fields, vec!["title", "source", "date", "content"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_permissive_config() {
        let config = ValidationConfig::permissive();
        assert_eq!(config.min_sources, 1);
        assert_eq!(config.confidence_threshold, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_strict_config() {
        let config = ValidationConfig::strict();
        assert_eq!(config.min_content_length, 20);
        assert_eq!(config.earliest_year, Some(2000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        let mut config = ValidationConfig::default();
        config.min_sources = 0;
        assert!(config.validate().is_err());

        let mut config = ValidationConfig::default();
        config.confidence_threshold = 1.2;
        assert!(config.validate().is_err());

        let mut config = ValidationConfig::default();
        config.required_fields.retain(|f| f != "date");
        assert!(config.validate().unwrap_err().contains("date"));

        let mut config = ValidationConfig::default();
        config.required_fields.push("title".to_string());
        assert!(config.validate().unwrap_err().contains("twice"));

        let mut config = ValidationConfig::default();
        config.earliest_year = Some(2030);
        config.latest_year = Some(2020);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_extra_required_fields_allowed() {
        let mut config = ValidationConfig::default();
        config.required_fields.push("author".to_string());
        assert!(config.validate().is_ok());
    }
}
