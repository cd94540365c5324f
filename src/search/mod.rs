//! Faceted search over the dataset, heritage object and person indices.
//!
//! Each fetcher issues one request per call, carrying the primary query, the
//! `all` global aggregation and the query-scoped facet aggregations. Hits are
//! mapped into records; labels and enrichment are resolved in one batch per
//! page and merged in. Failures of the index are returned to the caller,
//! failures of the graph store only cost the enrichment.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

pub mod datasets;
pub mod facets;
pub mod index;
pub mod objects;
pub mod options;
pub mod persons;
pub mod request;
pub mod response;

pub use datasets::{Dataset, DatasetFetcher, DatasetSortBy};
pub use facets::{build_filters, Facet, FacetKind};
pub use index::{HttpSearchIndex, RetryPolicy, SearchIndexClient};
pub use objects::{HeritageObject, HeritageObjectFetcher, HeritageObjectSortBy};
pub use options::{SearchOptions, SearchParams, SortField, DEFAULT_LIMIT, MAX_LIMIT};
pub use persons::{Person, PersonFetcher, PersonSortBy};
pub use response::{Aggregations, Bucket, BucketKey, Hit, SearchResponse};

use crate::core::is_valid_iri;
use crate::error::{Error, Result};

/// One named index behind a [`SearchIndexClient`].
#[derive(Clone)]
pub struct Index {
    client: Arc<dyn SearchIndexClient>,
    name: String,
}

impl Index {
    pub fn new(client: Arc<dyn SearchIndexClient>, name: impl Into<String>) -> Self {
        Self {
            client,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run a faceted search and parse the page strictly.
    pub async fn search<D, S>(
        &self,
        params: &SearchParams<S>,
        facets: &[Facet],
    ) -> Result<(Vec<Hit<D>>, u64, Aggregations)>
    where
        D: DeserializeOwned,
        S: SortField,
    {
        let body = request::build_search_request(params, facets);
        let raw = self.client.search(&self.name, &body).await?;
        let response = SearchResponse::<D>::from_value(raw)?;

        let aggregations = response.aggregations.ok_or_else(|| {
            Error::InvalidResponse(format!(
                "Search response of '{}' has no aggregations",
                self.name
            ))
        })?;

        tracing::debug!(
            index = %self.name,
            total = response.hits.total.value,
            count = response.hits.hits.len(),
            "Search completed"
        );

        Ok((response.hits.hits, response.hits.total.value, aggregations))
    }

    /// Fetch the single document with IRI `id`.
    ///
    /// `None` when the IRI is invalid, unknown or, as a data integrity
    /// anomaly, shared by more than one document.
    pub async fn lookup<D: DeserializeOwned>(&self, id: &str) -> Result<Option<D>> {
        if !is_valid_iri(id) {
            tracing::debug!(iri = id, "Lookup of invalid IRI");
            return Ok(None);
        }

        let body = request::build_lookup_request(id);
        let raw: Value = self.client.search(&self.name, &body).await?;
        let response = SearchResponse::<D>::from_value(raw)?;
        let total = response.hits.total.value;
        let mut hits = response.hits.hits;

        if total > 1 || hits.len() > 1 {
            tracing::warn!(
                index = %self.name,
                iri = id,
                count = total.max(hits.len() as u64),
                "Identifier matches more than one document"
            );
            return Ok(None);
        }

        Ok(hits.pop().map(|hit| hit.source))
    }
}
