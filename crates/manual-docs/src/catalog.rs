use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::model::{sort_newest_first, Document, DocumentSummary};

/// Errors surfaced while reading a document export.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read documents from {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse documents in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Category selection for list views. `"all"` selects every document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => name == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value {
            "all" => CategoryFilter::All,
            other => CategoryFilter::Named(other.to_owned()),
        })
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Named(name) => f.write_str(name),
        }
    }
}

/// Read-only view over the documents in a store export, kept in store order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    documents: Vec<Document>,
}

impl Catalog {
    pub fn new(documents: Vec<Document>) -> Self {
        Catalog { documents }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json).map(Catalog::new)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.into(),
            source,
        })?;
        let catalog = Catalog::from_json(&contents).map_err(|source| CatalogError::Parse {
            path: path.into(),
            source,
        })?;
        debug!(path = %path.display(), documents = catalog.len(), "loaded document catalog");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// First document with `id`, as the store resolves lookups.
    pub fn get(&self, id: u64) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id == id)
    }

    /// Every document's summary, newest first.
    pub fn summaries(&self) -> Vec<DocumentSummary> {
        self.in_category(&CategoryFilter::All)
    }

    pub fn in_category(&self, filter: &CategoryFilter) -> Vec<DocumentSummary> {
        let mut summaries: Vec<DocumentSummary> = self
            .documents
            .iter()
            .filter(|doc| filter.matches(&doc.category))
            .map(Document::summary)
            .collect();
        sort_newest_first(&mut summaries);
        summaries
    }

    /// Distinct categories in the order they first appear in the store.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.documents
            .iter()
            .map(|doc| doc.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_category_filters() {
        assert_eq!("all".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!(
            "Guides".parse::<CategoryFilter>(),
            Ok(CategoryFilter::Named("Guides".into()))
        );
        assert_eq!(CategoryFilter::Named("Guides".into()).to_string(), "Guides");
        assert!(CategoryFilter::All.matches("anything"));
        assert!(!CategoryFilter::Named("a".into()).matches("b"));
    }

    #[test]
    fn empty_export_is_an_empty_catalog() {
        let catalog = Catalog::from_json("[]").unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.summaries().is_empty());
        assert!(catalog.categories().is_empty());
    }

    #[test]
    fn rejects_non_array_exports() {
        assert!(Catalog::from_json("{\"id\": 1}").is_err());
    }
}
