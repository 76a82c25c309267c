//! Sources command implementation.

use crate::cli::SourcesArgs;
use crate::error::Result;
use crate::output::Formatter;
use waypoint_domain::{Source, SourceCatalog, SourceCategory};

/// Execute the sources command.
pub fn execute_sources(args: SourcesArgs, catalog: &SourceCatalog, formatter: &Formatter) -> Result<()> {
    let sources = select(catalog, args.category.map(Into::into));
    println!("{}", formatter.format_sources(&sources)?);
    Ok(())
}

/// Sources in catalog order, optionally limited to one category.
fn select(catalog: &SourceCatalog, category: Option<SourceCategory>) -> Vec<&Source> {
    match category {
        Some(category) => catalog.sources_for(category).iter().collect(),
        None => catalog.all_sources(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SourceCatalog {
        SourceCatalog::new(vec![
            Source::new("Transit Review", "https://transit.example.org", SourceCategory::Academic, 1),
            Source::new("Metro Daily", "https://metro.example.org", SourceCategory::News, 2),
            Source::new("City Wire", "https://wire.example.org", SourceCategory::News, 3),
        ])
        .unwrap()
    }

    #[test]
    fn test_select_all() {
        let catalog = catalog();
        assert_eq!(select(&catalog, None).len(), 3);
    }

    #[test]
    fn test_select_category() {
        let catalog = catalog();
        let news = select(&catalog, Some(SourceCategory::News));
        assert_eq!(news.len(), 2);
        assert!(news.iter().all(|s| s.category == SourceCategory::News));
        assert!(select(&catalog, Some(SourceCategory::Industry)).is_empty());
    }
}
