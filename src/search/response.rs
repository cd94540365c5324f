//! Typed view of search index responses.
//!
//! Everything the fetchers read is deserialized strictly: a response that does
//! not match these shapes is a contract violation and surfaces as
//! [`Error::InvalidResponse`].

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::{Error, Result};

/// Name of the global aggregation holding the corpus-wide facet buckets.
pub const GLOBAL_AGGREGATION: &str = "all";

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse<T> {
    pub hits: Hits<T>,
    #[serde(default)]
    pub aggregations: Option<Aggregations>,
}

impl<T: DeserializeOwned> SearchResponse<T> {
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| Error::InvalidResponse(format!("Unexpected search response: {}", e)))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hits<T> {
    pub total: TotalHits,
    pub hits: Vec<Hit<T>>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TotalHits {
    pub value: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hit<T> {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_source")]
    pub source: T,
}

/// The `all` global aggregation plus the query-scoped facet aggregations.
#[derive(Debug, Clone, Deserialize)]
pub struct Aggregations {
    pub all: GlobalAggregation,
    #[serde(flatten)]
    pub scoped: HashMap<String, BucketAggregation>,
}

impl Aggregations {
    /// Global and scoped buckets of one facet.
    pub fn facet(&self, name: &str) -> Result<(&[Bucket], &[Bucket])> {
        let global = self.all.facets.get(name).ok_or_else(|| missing(GLOBAL_AGGREGATION, name))?;
        let scoped = self.scoped.get(name).ok_or_else(|| missing("query", name))?;
        Ok((&global.buckets, &scoped.buckets))
    }
}

fn missing(scope: &str, facet: &str) -> Error {
    Error::InvalidResponse(format!("Missing {} aggregation for facet '{}'", scope, facet))
}

#[derive(Debug, Clone, Deserialize)]
pub struct GlobalAggregation {
    pub doc_count: u64,
    #[serde(flatten)]
    pub facets: HashMap<String, BucketAggregation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BucketAggregation {
    pub buckets: Vec<Bucket>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Bucket {
    pub key: BucketKey,
    pub doc_count: u64,
}

impl Bucket {
    pub fn new(key: BucketKey, doc_count: u64) -> Self {
        Self { key, doc_count }
    }
}

/// Bucket key: an `[id, name]` pair for multi-term facets, otherwise a scalar.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BucketKey {
    Pair(String, String),
    Text(String),
    Number(serde_json::Number),
}

impl BucketKey {
    pub fn pair(id: impl Into<String>, name: impl Into<String>) -> Self {
        BucketKey::Pair(id.into(), name.into())
    }

    pub fn text(id: impl Into<String>) -> Self {
        BucketKey::Text(id.into())
    }

    pub fn id(&self) -> String {
        match self {
            BucketKey::Pair(id, _) => id.clone(),
            BucketKey::Text(id) => id.clone(),
            BucketKey::Number(number) => number.to_string(),
        }
    }

    /// Name carried by the key itself (pairs only).
    pub fn name(&self) -> Option<&str> {
        match self {
            BucketKey::Pair(_, name) => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Doc {
        iri: String,
    }

    fn sample() -> serde_json::Value {
        json!({
            "took": 3,
            "hits": {
                "total": {"value": 12, "relation": "eq"},
                "hits": [{"_id": "1", "_score": 1.0, "_source": {"iri": "https://example.org/1"}}]
            },
            "aggregations": {
                "all": {
                    "doc_count": 40,
                    "publishers": {"buckets": [
                        {
                            "key": ["https://example.org/p/1", "Archive"],
                            "key_as_string": "x|y",
                            "doc_count": 10
                        }
                    ]},
                    "birthYears": {"buckets": [{"key": 1850, "doc_count": 3}]}
                },
                "publishers": {"doc_count_error_upper_bound": 0, "buckets": []},
                "birthYears": {"buckets": [{"key": 1850, "doc_count": 1}]}
            }
        })
    }

    #[test]
    fn test_parses_hits_and_aggregations() {
        let response = SearchResponse::<Doc>::from_value(sample()).unwrap();
        assert_eq!(response.hits.total.value, 12);
        assert_eq!(response.hits.hits[0].source.iri, "https://example.org/1");

        let aggregations = response.aggregations.unwrap();
        assert_eq!(aggregations.all.doc_count, 40);

        let (global, scoped) = aggregations.facet("publishers").unwrap();
        assert_eq!(global[0].key, BucketKey::pair("https://example.org/p/1", "Archive"));
        assert!(scoped.is_empty());

        let (global, _) = aggregations.facet("birthYears").unwrap();
        assert_eq!(global[0].key.id(), "1850");
        assert_eq!(global[0].key.name(), None);
    }

    #[test]
    fn test_missing_facet_is_invalid() {
        let aggregations = SearchResponse::<Doc>::from_value(sample())
            .unwrap()
            .aggregations
            .unwrap();
        assert!(matches!(
            aggregations.facet("licenses"),
            Err(Error::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_malformed_response_is_rejected() {
        let malformed = json!({"hits": {"hits": []}});
        assert!(matches!(
            SearchResponse::<Doc>::from_value(malformed),
            Err(Error::InvalidResponse(_))
        ));

        let bad_source = json!({
            "hits": {
                "total": {"value": 1},
                "hits": [{"_id": "1", "_source": {"name": "x"}}]
            }
        });
        assert!(matches!(
            SearchResponse::<Doc>::from_value(bad_source),
            Err(Error::InvalidResponse(_))
        ));
    }
}
