//! Configuration for the pipeline
//!
//! Loaded from a single TOML file:
//!
//! ```toml
//! [fetch]
//! concurrency = 4
//!
//! [validation]
//! min_sources = 3
//! confidence_threshold = 0.8
//!
//! [scoring]
//! breadth_weight = 0.5
//! trust_weight = 0.5
//!
//! [matching]
//! strategy = "exact"
//!
//! [[sources.academic]]
//! name = "Transport Policy Journal"
//! base_url = "https://example.org/api/articles"
//! priority = 1
//! ```
//!
//! Unknown top-level tables (such as the CLI's `[output]`) are ignored.

use crate::PipelineError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use waypoint_corroborator::MatchingConfig;
use waypoint_domain::{ScoringConfig, Source, SourceCatalog, SourceCategory};
use waypoint_fetch::FetchConfig;
use waypoint_gatekeeper::ValidationConfig;

/// One `[[sources.<category>]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Source name, unique within its category
    pub name: String,

    /// Endpoint
    pub base_url: String,

    /// Priority, 1 is most trusted
    pub priority: u32,

    /// Disabled sources are skipped at load
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Configuration file as written on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Fetch settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Validation and acceptance thresholds
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Confidence weights
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Matching strategy
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Sources per category
    #[serde(default)]
    pub sources: BTreeMap<SourceCategory, Vec<SourceEntry>>,
}

/// Validated, immutable configuration of a pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Enabled sources
    pub catalog: SourceCatalog,

    /// Validation and acceptance thresholds
    pub validation: ValidationConfig,

    /// Confidence weights
    pub scoring: ScoringConfig,

    /// Matching strategy
    pub matching: MatchingConfig,

    /// Fetch settings
    pub fetch: FetchConfig,
}

impl PipelineConfig {
    /// Default settings around a catalog
    pub fn new(catalog: SourceCatalog) -> Self {
        Self {
            catalog,
            validation: ValidationConfig::default(),
            scoring: ScoringConfig::default(),
            matching: MatchingConfig::default(),
            fetch: FetchConfig::default(),
        }
    }

    /// Replace the validation settings
    pub fn with_validation(mut self, validation: ValidationConfig) -> Self {
        self.validation = validation;
        self
    }

    /// Replace the matching settings
    pub fn with_matching(mut self, matching: MatchingConfig) -> Self {
        self.matching = matching;
        self
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, PipelineError> {
        let file: ConfigFile = toml::from_str(toml_str)?;
        Self::try_from(file)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, PipelineError> {
        toml::to_string_pretty(&ConfigFile::from(self))
            .map_err(|e| PipelineError::Config(format!("Failed to serialize to TOML: {}", e)))
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), PipelineError> {
        let sections = [
            ("fetch", self.fetch.validate()),
            ("validation", self.validation.validate()),
            ("scoring", self.scoring.validate()),
            ("matching", self.matching.validate()),
        ];
        for (section, result) in sections {
            result.map_err(|e| PipelineError::Config(format!("[{}] {}", section, e)))?;
        }
        Ok(())
    }
}

impl TryFrom<ConfigFile> for PipelineConfig {
    type Error = PipelineError;

    fn try_from(file: ConfigFile) -> Result<Self, Self::Error> {
        let sources = file.sources.into_iter().flat_map(|(category, entries)| {
            entries
                .into_iter()
                .filter(|entry| entry.enabled)
                .map(move |entry| Source::new(entry.name, entry.base_url, category, entry.priority))
        });
        let catalog =
            SourceCatalog::new(sources).map_err(|e| PipelineError::Config(e.to_string()))?;

        let config = Self {
            catalog,
            validation: file.validation,
            scoring: file.scoring,
            matching: file.matching,
            fetch: file.fetch,
        };
        config.validate()?;
        Ok(config)
    }
}

impl From<&PipelineConfig> for ConfigFile {
    fn from(config: &PipelineConfig) -> Self {
        let mut sources: BTreeMap<SourceCategory, Vec<SourceEntry>> = BTreeMap::new();
        for source in config.catalog.all_sources() {
            sources.entry(source.category).or_default().push(SourceEntry {
                name: source.name.clone(),
                base_url: source.base_url.clone(),
                priority: source.priority,
                enabled: true,
            });
        }

        Self {
            fetch: config.fetch.clone(),
            validation: config.validation.clone(),
            scoring: config.scoring.clone(),
            matching: config.matching.clone(),
            sources,
        }
    }
}
