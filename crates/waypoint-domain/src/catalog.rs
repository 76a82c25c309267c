//! Source catalog - configured sources grouped by category

use crate::{Source, SourceCategory, SourceKey};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Errors raised while loading a catalog
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Two sources share a name within one category
    #[error("Duplicate source '{name}' in category '{category}'")]
    DuplicateSource {
        /// Category containing the duplicate
        category: SourceCategory,
        /// The repeated name
        name: String,
    },

    /// Priorities are positive integers
    #[error("Source '{0}' has priority 0 (priorities start at 1)")]
    InvalidPriority(SourceKey),

    /// Source names must not be blank
    #[error("Source with empty name in category '{0}'")]
    EmptyName(SourceCategory),
}

/// Immutable set of configured sources
///
/// Sources within a category are kept sorted ascending by priority; ties keep
/// their configuration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceCatalog {
    by_category: BTreeMap<SourceCategory, Vec<Source>>,
    index: HashMap<SourceKey, Source>,
}

impl SourceCatalog {
    /// Build a catalog, rejecting duplicate names within a category
    pub fn new(sources: impl IntoIterator<Item = Source>) -> Result<Self, CatalogError> {
        let mut by_category: BTreeMap<SourceCategory, Vec<Source>> = BTreeMap::new();
        let mut index = HashMap::new();

        for source in sources {
            if source.name.trim().is_empty() {
                return Err(CatalogError::EmptyName(source.category));
            }
            let key = source.key();
            if source.priority == 0 {
                return Err(CatalogError::InvalidPriority(key));
            }
            if index.contains_key(&key) {
                return Err(CatalogError::DuplicateSource {
                    category: source.category,
                    name: source.name,
                });
            }
            index.insert(key, source.clone());
            by_category.entry(source.category).or_default().push(source);
        }

        for sources in by_category.values_mut() {
            // stable sort keeps configuration order among equal priorities
            sources.sort_by_key(|s| s.priority);
        }

        Ok(Self { by_category, index })
    }

    /// Sources of one category, priority 1 first
    ///
    /// A category without sources yields an empty slice.
    pub fn sources_for(&self, category: SourceCategory) -> &[Source] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All sources, grouped by category in catalog order
    pub fn all_sources(&self) -> Vec<&Source> {
        SourceCategory::ALL
            .iter()
            .flat_map(|c| self.sources_for(*c))
            .collect()
    }

    /// Resolve a source key
    pub fn get(&self, key: &SourceKey) -> Option<&Source> {
        self.index.get(key)
    }

    /// Check whether a source is configured
    pub fn contains(&self, key: &SourceKey) -> bool {
        self.index.contains_key(key)
    }

    /// Total number of sources
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the catalog has no sources
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str, category: SourceCategory, priority: u32) -> Source {
        Source::new(name, format!("https://{}.example", name), category, priority)
    }

    #[test]
    fn test_sources_sorted_by_priority() {
        let catalog = SourceCatalog::new(vec![
            source("late", SourceCategory::Academic, 3),
            source("first", SourceCategory::Academic, 1),
            source("middle", SourceCategory::Academic, 2),
        ])
        .unwrap();

        let names: Vec<_> = catalog
            .sources_for(SourceCategory::Academic)
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["first", "middle", "late"]);
    }

    #[test]
    fn test_empty_category() {
        let catalog = SourceCatalog::new(vec![source("a", SourceCategory::News, 1)]).unwrap();
        assert!(catalog.sources_for(SourceCategory::Industry).is_empty());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = SourceCatalog::new(vec![
            source("dup", SourceCategory::News, 1),
            source("dup", SourceCategory::News, 2),
        ]);
        assert_eq!(
            result.unwrap_err(),
            CatalogError::DuplicateSource {
                category: SourceCategory::News,
                name: "dup".to_string(),
            }
        );
    }

    #[test]
    fn test_same_name_across_categories_allowed() {
        let catalog = SourceCatalog::new(vec![
            source("shared", SourceCategory::News, 1),
            source("shared", SourceCategory::Industry, 2),
        ])
        .unwrap();
        assert_eq!(catalog.len(), 2);
        let key = SourceKey::new(SourceCategory::Industry, "shared");
        assert_eq!(catalog.get(&key).unwrap().priority, 2);
    }

    #[test]
    fn test_zero_priority_rejected() {
        let result = SourceCatalog::new(vec![source("zero", SourceCategory::Academic, 0)]);
        assert!(matches!(result, Err(CatalogError::InvalidPriority(_))));
    }

    #[test]
    fn test_all_sources_groups_categories() {
        let catalog = SourceCatalog::new(vec![
            source("n", SourceCategory::News, 1),
            source("a", SourceCategory::Academic, 2),
            source("i", SourceCategory::Industry, 1),
        ])
        .unwrap();
        let categories: Vec<_> = catalog.all_sources().iter().map(|s| s.category).collect();
        assert_eq!(
            categories,
            vec![SourceCategory::Academic, SourceCategory::Industry, SourceCategory::News]
        );
    }
}
