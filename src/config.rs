//! Configuration of the search index, the SPARQL endpoint and the caches.

use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::DEFAULT_CAPACITY;
use crate::enrichment::{
    DatasetEnricher, DatasetProfile, Enricher, HeritageObjectEnricher, HeritageObjectProfile,
    LabelFetcher, PersonEnricher, PersonProfile,
};
use crate::error::{Error, Result};
use crate::search::{
    DatasetFetcher, HeritageObjectFetcher, HttpSearchIndex, Index, PersonFetcher, RetryPolicy,
    SearchIndexClient,
};
use crate::sparql::{HttpSparqlClient, SparqlClient, SparqlEndpoint};

const ENV_PREFIX: &str = "HERITAGE_SEARCH_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchIndexConfig,
    pub sparql: SparqlEndpointConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchIndexConfig {
    /// Base URL of the index cluster, e.g. `http://localhost:9200`
    pub url: String,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
    pub retry: RetryPolicy,
    pub dataset_index: String,
    pub heritage_object_index: String,
    pub person_index: String,
}

impl Default for SearchIndexConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
            api_key: None,
            timeout_ms: 5000,
            retry: RetryPolicy::default(),
            dataset_index: "datasets".to_string(),
            heritage_object_index: "heritage-objects".to_string(),
            person_index: "persons".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparqlEndpointConfig {
    pub url: String,
    pub auth_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SparqlEndpointConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:7878/query".to_string(),
            auth_token: None,
            timeout_secs: 30,
        }
    }
}

impl SparqlEndpointConfig {
    pub fn endpoint(&self) -> SparqlEndpoint {
        SparqlEndpoint {
            url: self.url.clone(),
            auth_token: self.auth_token.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entries per label fetcher or enricher
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl Config {
    /// Defaults overridden by `HERITAGE_SEARCH_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`Config::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(&format!("{}{}", ENV_PREFIX, name)).filter(|value| !value.trim().is_empty())
        };
        let mut config = Config::default();

        if let Some(url) = var("INDEX_URL") {
            config.search.url = url;
        }
        if let Some(api_key) = var("INDEX_API_KEY") {
            config.search.api_key = Some(api_key);
        }
        if let Some(timeout) = var("INDEX_TIMEOUT_MS") {
            config.search.timeout_ms = parse_number("INDEX_TIMEOUT_MS", &timeout)?;
        }
        if let Some(attempts) = var("INDEX_MAX_ATTEMPTS") {
            config.search.retry.max_attempts = parse_number("INDEX_MAX_ATTEMPTS", &attempts)?;
        }
        if let Some(index) = var("DATASET_INDEX") {
            config.search.dataset_index = index;
        }
        if let Some(index) = var("HERITAGE_OBJECT_INDEX") {
            config.search.heritage_object_index = index;
        }
        if let Some(index) = var("PERSON_INDEX") {
            config.search.person_index = index;
        }
        if let Some(url) = var("SPARQL_URL") {
            config.sparql.url = url;
        }
        if let Some(token) = var("SPARQL_TOKEN") {
            config.sparql.auth_token = Some(token);
        }
        if let Some(timeout) = var("SPARQL_TIMEOUT_SECS") {
            config.sparql.timeout_secs = parse_number("SPARQL_TIMEOUT_SECS", &timeout)?;
        }
        if let Some(capacity) = var("CACHE_CAPACITY") {
            config.cache.capacity = parse_number("CACHE_CAPACITY", &capacity)?;
        }

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        Error::Config(format!(
            "{}{} must be a number, got '{}'",
            ENV_PREFIX, name, value
        ))
    })
}

/// The long-lived fetchers of a process and their shared clients.
pub struct Services {
    pub labels: Arc<LabelFetcher>,
    pub datasets: Arc<DatasetFetcher>,
    pub heritage_objects: Arc<HeritageObjectFetcher>,
    pub persons: Arc<PersonFetcher>,
}

impl Services {
    /// Connect to the configured search index and SPARQL endpoint.
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = Duration::from_millis(config.search.timeout_ms);
        let mut index =
            HttpSearchIndex::new(&config.search.url, timeout)?.with_retry(config.search.retry);
        if let Some(api_key) = &config.search.api_key {
            index = index.with_api_key(api_key);
        }

        let sparql = HttpSparqlClient::new(config.sparql.endpoint())?;

        Ok(Self::with_clients(config, Arc::new(index), Arc::new(sparql)))
    }

    /// Wire the fetchers around existing clients.
    pub fn with_clients(
        config: &Config,
        index: Arc<dyn SearchIndexClient>,
        sparql: Arc<dyn SparqlClient>,
    ) -> Self {
        let capacity = config.cache.capacity;
        let labels = Arc::new(LabelFetcher::with_capacity(Arc::clone(&sparql), capacity));

        let dataset_enricher: Arc<DatasetEnricher> =
            Arc::new(Enricher::with_capacity(Arc::clone(&sparql), DatasetProfile, capacity));
        let object_enricher: Arc<HeritageObjectEnricher> = Arc::new(
            Enricher::with_capacity(Arc::clone(&sparql), HeritageObjectProfile, capacity)
                .with_label_fetcher(Arc::clone(&labels)),
        );
        let person_enricher: Arc<PersonEnricher> = Arc::new(
            Enricher::with_capacity(Arc::clone(&sparql), PersonProfile, capacity)
                .with_label_fetcher(Arc::clone(&labels)),
        );

        let search = &config.search;
        Self {
            datasets: Arc::new(DatasetFetcher::new(
                Index::new(Arc::clone(&index), &search.dataset_index),
                Arc::clone(&labels),
                dataset_enricher,
            )),
            heritage_objects: Arc::new(HeritageObjectFetcher::new(
                Index::new(Arc::clone(&index), &search.heritage_object_index),
                Arc::clone(&labels),
                object_enricher,
            )),
            persons: Arc::new(PersonFetcher::new(
                Index::new(index, &search.person_index),
                Arc::clone(&labels),
                person_enricher,
            )),
            labels,
        }
    }
}
