//! Core data structures shared by the search fetchers and the enrichers

use oxigraph::model::NamedNode;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub mod vocab;

/// Check that a string is an absolute RFC 3987 IRI.
pub fn is_valid_iri(iri: &str) -> bool {
    NamedNode::new(iri).is_ok()
}

/// Deduplicate a batch of candidate IRIs and drop the invalid ones.
/// The order of first appearance is kept.
pub fn valid_unique_iris<I, S>(iris: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut result = Vec::new();

    for iri in iris {
        let iri = iri.as_ref();
        if !is_valid_iri(iri) {
            tracing::debug!(iri, "Skipping invalid IRI");
            continue;
        }
        if seen.insert(iri.to_string()) {
            result.push(iri.to_string());
        }
    }

    result
}

/// A referenced entity with a display name (publisher, license, place, type, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: String,
    pub name: String,
}

impl Term {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// The dataset a heritage object or person record belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRef {
    pub id: String,
    pub name: String,
    pub publisher: Term,
}

/// One facet value with its count under the current query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultFilter {
    pub id: String,
    pub name: String,
    pub total_count: u64,
}

impl SearchResultFilter {
    pub fn new(id: impl Into<String>, name: impl Into<String>, total_count: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            total_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortOrder {
    #[serde(rename = "asc")]
    Ascending,
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    /// Lenient parse; `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortOrder::Ascending),
            "desc" | "descending" => Some(SortOrder::Descending),
            _ => None,
        }
    }

    /// Order keyword understood by the search index.
    pub fn as_index_order(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// A page of search results plus the facet model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult<T, S> {
    pub total_count: u64,
    pub offset: u64,
    pub limit: u64,
    pub sort_by: S,
    pub sort_order: SortOrder,
    pub items: Vec<T>,
    pub filters: BTreeMap<String, Vec<SearchResultFilter>>,
}
