//! Loosely typed search options and their validated form.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::facets::{find_facet, Facet};
use crate::core::SortOrder;

pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;
/// Query matching every document.
pub const MATCH_ALL: &str = "*";

/// Sort keys of an index.
pub trait SortField: Copy + Default + Serialize + Send + Sync {
    /// Lenient parse; `None` for unknown values.
    fn parse(value: &str) -> Option<Self>;

    /// Field the index sorts on.
    fn index_field(&self) -> &'static str;
}

/// Search options as received from callers. Nothing here is trusted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptions {
    pub query: Option<String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    /// Selected values per facet name
    pub filters: BTreeMap<String, Vec<String>>,
}

impl SearchOptions {
    /// Build options from query-string pairs. Reserved keys set the paging and
    /// sorting options; every other key is taken as a facet name.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut options = SearchOptions::default();

        for (key, value) in pairs {
            let value = value.into();
            match key.as_ref() {
                "query" => options.query = Some(value),
                "offset" => options.offset = value.trim().parse().ok(),
                "limit" => options.limit = value.trim().parse().ok(),
                "sortBy" => options.sort_by = Some(value),
                "sortOrder" => options.sort_order = Some(value),
                facet => options.filters.entry(facet.to_string()).or_default().push(value),
            }
        }

        options
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_filter(mut self, facet: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.entry(facet.into()).or_default().push(value.into());
        self
    }
}

/// Validated search parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams<S> {
    pub query: String,
    pub offset: u64,
    pub limit: u64,
    pub sort_by: S,
    pub sort_order: SortOrder,
    /// Selected values of known facets; never empty per entry
    pub filters: BTreeMap<String, Vec<String>>,
}

impl<S: SortField> SearchParams<S> {
    /// Validate options, replacing every invalid value with its default.
    pub fn from_options(options: &SearchOptions, facets: &[Facet]) -> Self {
        let query = options
            .query
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
            .unwrap_or(MATCH_ALL)
            .to_string();

        let offset = options
            .offset
            .and_then(|offset| u64::try_from(offset).ok())
            .unwrap_or(0);

        let limit = options
            .limit
            .and_then(|limit| u64::try_from(limit).ok())
            .filter(|limit| (1..=MAX_LIMIT).contains(limit))
            .unwrap_or(DEFAULT_LIMIT);

        let sort_by = options
            .sort_by
            .as_deref()
            .and_then(S::parse)
            .unwrap_or_default();
        let sort_order = options
            .sort_order
            .as_deref()
            .and_then(SortOrder::parse)
            .unwrap_or_default();

        let mut filters = BTreeMap::new();
        for (name, values) in &options.filters {
            if find_facet(facets, name).is_none() {
                tracing::debug!(facet = %name, "Ignoring unknown facet");
                continue;
            }

            let mut selected: Vec<String> = Vec::new();
            for value in values.iter().map(|value| value.trim()).filter(|value| !value.is_empty()) {
                if !selected.iter().any(|existing| existing == value) {
                    selected.push(value.to_string());
                }
            }

            if !selected.is_empty() {
                filters.insert(name.clone(), selected);
            }
        }

        Self {
            query,
            offset,
            limit,
            sort_by,
            sort_order,
            filters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
    enum TestSort {
        #[default]
        Relevance,
        Name,
    }

    impl SortField for TestSort {
        fn parse(value: &str) -> Option<Self> {
            match value {
                "relevance" => Some(TestSort::Relevance),
                "name" => Some(TestSort::Name),
                _ => None,
            }
        }

        fn index_field(&self) -> &'static str {
            match self {
                TestSort::Relevance => "_score",
                TestSort::Name => "name.keyword",
            }
        }
    }

    const FACETS: [Facet; 1] = [Facet::iri("licenses", "license")];

    fn validate(options: SearchOptions) -> SearchParams<TestSort> {
        SearchParams::from_options(&options, &FACETS)
    }

    #[test]
    fn test_defaults() {
        let params = validate(SearchOptions::default());
        assert_eq!(params.query, MATCH_ALL);
        assert_eq!(params.offset, 0);
        assert_eq!(params.limit, DEFAULT_LIMIT);
        assert_eq!(params.sort_by, TestSort::Relevance);
        assert_eq!(params.sort_order, SortOrder::Descending);
        assert!(params.filters.is_empty());
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let params = validate(SearchOptions {
            query: Some("   ".into()),
            offset: Some(-5),
            limit: Some(MAX_LIMIT as i64 + 1),
            sort_by: Some("not-a-real-value".into()),
            sort_order: Some("sideways".into()),
            ..Default::default()
        });
        assert_eq!(params.query, MATCH_ALL);
        assert_eq!(params.offset, 0);
        assert_eq!(params.limit, DEFAULT_LIMIT);
        assert_eq!(params.sort_by, TestSort::Relevance);
        assert_eq!(params.sort_order, SortOrder::Descending);

        let params = validate(SearchOptions {
            limit: Some(0),
            ..Default::default()
        });
        assert_eq!(params.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_valid_values_are_kept() {
        let params = validate(SearchOptions {
            query: Some(" beads ".into()),
            offset: Some(20),
            limit: Some(MAX_LIMIT as i64),
            sort_by: Some("name".into()),
            sort_order: Some("asc".into()),
            ..Default::default()
        });
        assert_eq!(params.query, "beads");
        assert_eq!(params.offset, 20);
        assert_eq!(params.limit, MAX_LIMIT);
        assert_eq!(params.sort_by, TestSort::Name);
        assert_eq!(params.sort_order, SortOrder::Ascending);
    }

    #[test]
    fn test_filters_are_cleaned() {
        let options = SearchOptions::default()
            .with_filter("licenses", "https://example.org/l/1")
            .with_filter("licenses", " ")
            .with_filter("licenses", "https://example.org/l/1")
            .with_filter("colours", "red")
            .with_filter("licenses", "https://example.org/l/2");

        let params = validate(options);
        assert_eq!(params.filters.len(), 1);
        assert_eq!(
            params.filters["licenses"],
            vec!["https://example.org/l/1", "https://example.org/l/2"]
        );
    }

    #[test]
    fn test_from_pairs() {
        let options = SearchOptions::from_pairs(vec![
            ("query", "pottery"),
            ("offset", "abc"),
            ("limit", "25"),
            ("sortBy", "name"),
            ("licenses", "https://example.org/l/1"),
            ("licenses", "https://example.org/l/2"),
        ]);
        assert_eq!(options.query.as_deref(), Some("pottery"));
        assert_eq!(options.offset, None);
        assert_eq!(options.limit, Some(25));
        assert_eq!(options.sort_by.as_deref(), Some("name"));
        assert_eq!(options.filters["licenses"].len(), 2);
    }

    #[test]
    fn test_deserializes_from_json() {
        let options: SearchOptions = serde_json::from_value(serde_json::json!({
            "sortBy": "name",
            "filters": {"licenses": ["https://example.org/l/1"]}
        }))
        .unwrap();
        assert_eq!(options.sort_by.as_deref(), Some("name"));
        assert_eq!(options.filters["licenses"].len(), 1);
    }
}
