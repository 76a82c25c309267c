//! Source module - configured origins of raw records

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category a source belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceCategory {
    /// Universities, journals, research institutes
    Academic,

    /// Operators, manufacturers, trade bodies
    Industry,

    /// Press and trade news outlets
    News,
}

impl SourceCategory {
    /// All categories in catalog order
    pub const ALL: [SourceCategory; 3] = [
        SourceCategory::Academic,
        SourceCategory::Industry,
        SourceCategory::News,
    ];

    /// Get the category name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceCategory::Academic => "academic",
            SourceCategory::Industry => "industry",
            SourceCategory::News => "news",
        }
    }

    /// Parse a category from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "academic" => Some(SourceCategory::Academic),
            "industry" => Some(SourceCategory::Industry),
            "news" => Some(SourceCategory::News),
            _ => None,
        }
    }
}

impl std::str::FromStr for SourceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid source category: {}", s))
    }
}

impl fmt::Display for SourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a source: names are only unique within a category
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceKey {
    /// Category of the source
    pub category: SourceCategory,

    /// Source name, unique within `category`
    pub name: String,
}

impl SourceKey {
    /// Create a new source key
    pub fn new(category: SourceCategory, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
        }
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.name)
    }
}

/// A configured origin of raw records
///
/// Sources are immutable once loaded into a [`SourceCatalog`](crate::SourceCatalog).
/// `base_url` is opaque to the core and only consumed by fetch collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Source name, unique within its category
    pub name: String,

    /// Endpoint handed to the fetch collaborator
    pub base_url: String,

    /// Category of the source
    pub category: SourceCategory,

    /// Trust rank, 1 is the most trusted
    pub priority: u32,
}

impl Source {
    /// Create a new source
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        category: SourceCategory,
        priority: u32,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            category,
            priority,
        }
    }

    /// Key identifying this source in lookups
    pub fn key(&self) -> SourceKey {
        SourceKey::new(self.category, self.name.clone())
    }

    /// Trust weight of the source: `1 / priority`
    ///
    /// A priority-1 source weighs 1.0, priority 2 weighs 0.5, and so on.
    pub fn priority_weight(&self) -> f64 {
        if self.priority == 0 {
            return 0.0;
        }
        1.0 / self.priority as f64
    }
}
