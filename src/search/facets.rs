//! Facet definitions and the filter model built from their aggregations.

use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};

use super::response::{Aggregations, Bucket, BucketKey};
use crate::core::SearchResultFilter;
use crate::enrichment::LabelFetcher;
use crate::error::Result;

/// Upper bound on the number of buckets requested per facet.
pub const FACET_SIZE: usize = 1000;

/// How the values of a facet are stored in the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetKind {
    /// `[id, name]` pairs aggregated over two keyword fields
    Pair {
        id_field: &'static str,
        name_field: &'static str,
    },
    /// Bare IRIs; names come from the label fetcher
    Iri { field: &'static str },
    /// Plain values shown as-is
    Literal { field: &'static str },
}

/// A filterable dimension of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Facet {
    pub name: &'static str,
    pub kind: FacetKind,
}

impl Facet {
    pub const fn pair(
        name: &'static str,
        id_field: &'static str,
        name_field: &'static str,
    ) -> Self {
        Self {
            name,
            kind: FacetKind::Pair {
                id_field,
                name_field,
            },
        }
    }

    pub const fn iri(name: &'static str, field: &'static str) -> Self {
        Self {
            name,
            kind: FacetKind::Iri { field },
        }
    }

    pub const fn literal(name: &'static str, field: &'static str) -> Self {
        Self {
            name,
            kind: FacetKind::Literal { field },
        }
    }

    /// Field selected filter values are matched against.
    pub fn filter_field(&self) -> &'static str {
        match self.kind {
            FacetKind::Pair { id_field, .. } => id_field,
            FacetKind::Iri { field } | FacetKind::Literal { field } => field,
        }
    }

    /// Aggregation of this facet, ordered by key.
    pub fn aggregation(&self) -> Value {
        match self.kind {
            FacetKind::Pair { id_field, name_field } => json!({
                "multi_terms": {
                    "terms": [{"field": id_field}, {"field": name_field}],
                    "size": FACET_SIZE,
                    "order": {"_key": "asc"}
                }
            }),
            FacetKind::Iri { field } | FacetKind::Literal { field } => json!({
                "terms": {
                    "field": field,
                    "size": FACET_SIZE,
                    "order": {"_key": "asc"}
                }
            }),
        }
    }

    pub fn is_iri(&self) -> bool {
        matches!(self.kind, FacetKind::Iri { .. })
    }
}

/// Look up a facet by name.
pub fn find_facet<'a>(facets: &'a [Facet], name: &str) -> Option<&'a Facet> {
    facets.iter().find(|facet| facet.name == name)
}

/// Combine the corpus-wide buckets of a facet with the buckets of the current
/// query.
///
/// Every global bucket yields one entry, in global order, with the count of the
/// scoped bucket of the same id or 0. Scoped buckets without a global
/// counterpart are ignored.
pub fn build_filters<F>(
    global: &[Bucket],
    scoped: &[Bucket],
    name_of: F,
) -> Vec<SearchResultFilter>
where
    F: Fn(&BucketKey) -> String,
{
    let baseline = global
        .iter()
        .map(|bucket| SearchResultFilter::new(bucket.key.id(), name_of(&bucket.key), 0));

    let mut matched: HashMap<String, SearchResultFilter> = HashMap::with_capacity(scoped.len());
    for bucket in scoped {
        let id = bucket.key.id();
        matched.entry(id.clone()).or_insert_with(|| {
            SearchResultFilter::new(id, name_of(&bucket.key), bucket.doc_count)
        });
    }

    baseline
        .map(|unmatched| matched.remove(&unmatched.id).unwrap_or(unmatched))
        .collect()
}

/// IRIs of the IRI-keyed facet buckets, whose names need labels.
pub fn bucket_iris(aggregations: &Aggregations, facets: &[Facet]) -> Vec<String> {
    facets
        .iter()
        .filter(|facet| facet.is_iri())
        .filter_map(|facet| aggregations.all.facets.get(facet.name))
        .flat_map(|aggregation| aggregation.buckets.iter().map(|bucket| bucket.key.id()))
        .collect()
}

/// Filter model of every facet. Labels of IRI-keyed buckets must be loaded
/// beforehand; missing labels fall back to the IRI.
pub fn facet_filters(
    aggregations: &Aggregations,
    facets: &[Facet],
    labels: &LabelFetcher,
) -> Result<BTreeMap<String, Vec<SearchResultFilter>>> {
    let mut filters = BTreeMap::new();

    for facet in facets {
        let (global, scoped) = aggregations.facet(facet.name)?;
        let entries = build_filters(global, scoped, |key| match facet.kind {
            FacetKind::Pair { .. } => key.name().map(str::to_string).unwrap_or_else(|| key.id()),
            FacetKind::Iri { .. } => labels.name_or_iri(&key.id()),
            FacetKind::Literal { .. } => key.id(),
        });
        filters.insert(facet.name.to_string(), entries);
    }

    Ok(filters)
}
