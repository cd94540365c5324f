//! Batched, cached resolution of IRIs to display labels.

use std::collections::HashSet;
use std::sync::Arc;

use crate::cache::{CacheValue, EnrichmentCache, DEFAULT_CAPACITY};
use crate::core::{valid_unique_iris, vocab};
use crate::sparql::{values_block, SparqlClient};

/// Resolves IRIs to labels with one SELECT query per `load_by_iris` call.
///
/// Every IRI is queried at most once per process lifetime: IRIs the store has
/// no label for are remembered as not found. A failed query caches nothing so
/// the IRIs are retried on the next call.
pub struct LabelFetcher {
    client: Arc<dyn SparqlClient>,
    cache: EnrichmentCache<String>,
}

impl LabelFetcher {
    /// Predicate fallback chain used by [`LabelFetcher::load`]; the first
    /// predicate with a value wins.
    pub const DEFAULT_PREDICATES: [&'static str; 3] =
        [vocab::SKOS_PREF_LABEL, vocab::SCHEMA_NAME, vocab::RDFS_LABEL];

    pub fn new(client: Arc<dyn SparqlClient>) -> Self {
        Self::with_capacity(client, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(client: Arc<dyn SparqlClient>, capacity: usize) -> Self {
        Self {
            client,
            cache: EnrichmentCache::new(capacity),
        }
    }

    /// Load labels using the default predicate chain.
    pub async fn load<I, S>(&self, iris: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.load_by_iris(iris, &Self::DEFAULT_PREDICATES).await
    }

    /// Resolve the labels of `iris` that are not cached yet.
    ///
    /// `predicates` is a fallback chain: for each IRI the first predicate that
    /// has a value provides the label.
    ///
    /// Returns `false` when the query failed and some IRIs are still unknown;
    /// the failure itself is only logged.
    pub async fn load_by_iris<I, S>(&self, iris: I, predicates: &[&str]) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pending: Vec<String> = valid_unique_iris(iris)
            .into_iter()
            .filter(|iri| !self.cache.contains(iri))
            .collect();

        if pending.is_empty() {
            return true;
        }

        let predicates = valid_unique_iris(predicates);
        if predicates.is_empty() {
            tracing::warn!("No valid label predicates given, skipping label lookup");
            return false;
        }

        let query = build_label_query(&pending, &predicates);

        let bindings = match self.client.select(&query).await {
            Ok(bindings) => bindings,
            Err(error) => {
                tracing::warn!(%error, count = pending.len(), "Failed to load labels");
                return false;
            }
        };

        let requested: HashSet<&str> = pending.iter().map(String::as_str).collect();
        let mut resolved = HashSet::new();

        for binding in &bindings {
            let (Some(iri), Some(label)) = (binding.get("iri"), binding.get("label")) else {
                continue;
            };
            let iri = iri.value();
            // First binding per IRI wins
            if requested.contains(iri) && resolved.insert(iri.to_string()) {
                self.cache.set(iri, CacheValue::Resolved(label.value().to_string()));
            }
        }

        for iri in &pending {
            if !resolved.contains(iri) {
                self.cache.set(iri.as_str(), CacheValue::NotFound);
            }
        }

        tracing::debug!(
            requested = pending.len(),
            resolved = resolved.len(),
            "Loaded labels"
        );
        true
    }

    /// Cached label of an IRI. `None` both when it was never loaded and when
    /// the store has no label for it. Never touches the network.
    pub fn get_by_iri(&self, iri: &str) -> Option<String> {
        self.cache.get(iri).and_then(CacheValue::into_resolved)
    }

    /// Cached label, or the IRI itself.
    pub fn name_or_iri(&self, iri: &str) -> String {
        self.get_by_iri(iri).unwrap_or_else(|| iri.to_string())
    }
}

/// SELECT query binding `?iri` and `?label` for every IRI that has a label
/// under one of `predicates`, earlier predicates taking precedence.
pub fn build_label_query(iris: &[String], predicates: &[String]) -> String {
    let mut optionals = String::new();
    let mut candidates = Vec::with_capacity(predicates.len());

    for (index, predicate) in predicates.iter().enumerate() {
        optionals.push_str(&format!(
            "  OPTIONAL {{ ?iri <{}> ?label{} }}\n",
            predicate, index
        ));
        candidates.push(format!("?label{}", index));
    }

    format!(
        r#"SELECT ?iri ?label WHERE {{
  {}
{}  BIND(COALESCE({}) AS ?label)
  FILTER(BOUND(?label))
}}"#,
        values_block("iri", iris),
        optionals,
        candidates.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_query_shape() {
        let iris = vec![
            "https://example.org/a".to_string(),
            "https://example.org/b".to_string(),
        ];
        let predicates = vec![
            vocab::SKOS_PREF_LABEL.to_string(),
            vocab::RDFS_LABEL.to_string(),
        ];
        let query = build_label_query(&iris, &predicates);

        assert!(query.contains("VALUES ?iri { <https://example.org/a> <https://example.org/b> }"));
        assert!(query.contains(&format!(
            "OPTIONAL {{ ?iri <{}> ?label0 }}",
            vocab::SKOS_PREF_LABEL
        )));
        assert!(query.contains(&format!(
            "OPTIONAL {{ ?iri <{}> ?label1 }}",
            vocab::RDFS_LABEL
        )));
        assert!(query.contains("BIND(COALESCE(?label0, ?label1) AS ?label)"));
    }
}
