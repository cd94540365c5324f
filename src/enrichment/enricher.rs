//! Generic batched, cached CONSTRUCT-based enrichment.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use super::LabelFetcher;
use crate::cache::{CacheValue, EnrichmentCache, DEFAULT_CAPACITY};
use crate::core::valid_unique_iris;
use crate::sparql::{Resource, ResourceGraph, SparqlClient};

/// Describes how one kind of entity is enriched: which CONSTRUCT query to run
/// and how to turn a subject of the resulting graph into a record.
pub trait EnrichmentProfile: Send + Sync {
    type Record: Clone + Send + Sync;

    /// Short name used in log output
    const KIND: &'static str;

    /// CONSTRUCT query describing every IRI of the batch. The IRIs are valid
    /// and deduplicated.
    fn build_query(&self, iris: &[String]) -> String;

    /// IRIs mentioned in the graph whose labels are needed to build records.
    fn label_iris(&self, _graph: &ResourceGraph) -> Vec<String> {
        Vec::new()
    }

    /// Build the record of one requested subject.
    fn build_record(&self, resource: Resource<'_>, labels: Option<&LabelFetcher>)
        -> Self::Record;
}

/// Resolves IRIs to partial records of a profile, one CONSTRUCT query per
/// `load_by_iris` call. Shares the caching discipline of [`LabelFetcher`].
///
/// Records built while the label query failed carry IRIs in place of names.
/// They are served from the cache but loaded again on the next call.
pub struct Enricher<P: EnrichmentProfile> {
    client: Arc<dyn SparqlClient>,
    profile: P,
    cache: EnrichmentCache<P::Record>,
    labels: Option<Arc<LabelFetcher>>,
    unlabelled: Mutex<HashSet<String>>,
}

impl<P: EnrichmentProfile> Enricher<P> {
    pub fn new(client: Arc<dyn SparqlClient>, profile: P) -> Self {
        Self::with_capacity(client, profile, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(client: Arc<dyn SparqlClient>, profile: P, capacity: usize) -> Self {
        Self {
            client,
            profile,
            cache: EnrichmentCache::new(capacity),
            labels: None,
            unlabelled: Mutex::new(HashSet::new()),
        }
    }

    /// Resolve labels of IRIs referenced by the records (types, places, parties).
    pub fn with_label_fetcher(mut self, labels: Arc<LabelFetcher>) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn profile(&self) -> &P {
        &self.profile
    }

    /// Resolve the records of `iris` that are not cached yet, or that were
    /// cached without their labels.
    pub async fn load_by_iris<I, S>(&self, iris: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pending: Vec<String> = {
            let unlabelled = self.unlabelled.lock().unwrap_or_else(PoisonError::into_inner);
            valid_unique_iris(iris)
                .into_iter()
                .filter(|iri| !self.cache.contains(iri) || unlabelled.contains(iri))
                .collect()
        };

        if pending.is_empty() {
            return;
        }

        let query = self.profile.build_query(&pending);

        let statements = match self.client.construct(&query).await {
            Ok(statements) => statements,
            Err(error) => {
                tracing::warn!(
                    %error,
                    kind = P::KIND,
                    count = pending.len(),
                    "Failed to load enrichment"
                );
                return;
            }
        };

        let graph = ResourceGraph::from_statements(statements);

        let labelled = match &self.labels {
            Some(labels) => labels.load(self.profile.label_iris(&graph)).await,
            None => true,
        };

        let mut resolved = 0;
        for iri in &pending {
            match graph.resource(iri) {
                Some(resource) => {
                    let record = self.profile.build_record(resource, self.labels.as_deref());
                    self.cache.set(iri.as_str(), CacheValue::Resolved(record));
                    resolved += 1;
                }
                None => self.cache.set(iri.as_str(), CacheValue::NotFound),
            }
        }

        let mut unlabelled = self.unlabelled.lock().unwrap_or_else(PoisonError::into_inner);
        for iri in &pending {
            if labelled {
                unlabelled.remove(iri);
            } else {
                unlabelled.insert(iri.clone());
            }
        }

        tracing::debug!(
            kind = P::KIND,
            requested = pending.len(),
            resolved,
            labelled,
            "Loaded enrichment"
        );
    }

    /// Cached record of an IRI; `None` when never loaded or not found.
    pub fn get_by_iri(&self, iri: &str) -> Option<P::Record> {
        self.cache.get(iri).and_then(CacheValue::into_resolved)
    }
}
