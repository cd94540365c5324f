//! Shared test doubles for the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use heritage_search::search::SearchIndexClient;
use heritage_search::sparql::{Binding, SparqlClient, Statement, StoreSparqlClient};
use heritage_search::{Error, Result};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub const FIXTURES: &str = r#"
@prefix crm: <http://www.cidoc-crm.org/cidoc-crm/> .
@prefix dqv: <http://www.w3.org/ns/dqv#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix schema: <https://schema.org/> .
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .

<https://example.org/licenses/cc-by> skos:prefLabel "CC BY 4.0" ;
    rdfs:label "Creative Commons Attribution" .
<https://example.org/genres/archaeology> schema:name "Archaeology" .
<https://example.org/places/batavia> rdfs:label "Batavia" .
<https://example.org/types/purchase> skos:prefLabel "Purchase" .
<https://example.org/persons/seller> schema:name "J. Seller" .
<https://example.org/persons/buyer> schema:name "A. Buyer" .

<https://example.org/datasets/1> dqv:hasQualityMeasurement <https://example.org/measurements/1c>,
    <https://example.org/measurements/1a>,
    <https://example.org/measurements/1b> .
<https://example.org/measurements/1a> dqv:isMeasurementOf <https://example.org/metrics/a> ;
    dqv:value true .
<https://example.org/measurements/1b> dqv:isMeasurementOf <https://example.org/metrics/b> ;
    dqv:value false .
<https://example.org/measurements/1c> dqv:isMeasurementOf <https://example.org/metrics/c> ;
    dqv:value true .
<https://example.org/metrics/a> schema:name "Has license" ; schema:position 1 .
<https://example.org/metrics/b> schema:name "Has publisher" ; schema:position 2 .
<https://example.org/metrics/c> schema:name "Has description" ; schema:position 3 .

<https://example.org/events/1> a crm:E8_Acquisition ;
    crm:P24_transferred_title_of <https://example.org/objects/1> ;
    crm:P2_has_type <https://example.org/types/purchase> ;
    crm:P3_has_note "Bought at auction" ;
    crm:P4_has_time-span <https://example.org/events/1/time-span> ;
    crm:P23_transferred_title_from <https://example.org/persons/seller> ;
    crm:P22_transferred_title_to <https://example.org/persons/buyer> ;
    crm:P7_took_place_at <https://example.org/places/batavia> .
<https://example.org/events/1/time-span> crm:P82a_begin_of_the_begin "1852-03-01" ;
    crm:P82b_end_of_the_end "1852-03-31" .
"#;

/// SPARQL client around an embedded store that counts and records queries and
/// can be switched to fail.
pub struct SpySparqlClient {
    inner: StoreSparqlClient,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
    failing: AtomicBool,
    select_failing: AtomicBool,
}

impl SpySparqlClient {
    pub fn new(turtle: &str) -> Self {
        let inner = StoreSparqlClient::new().unwrap();
        inner.load_turtle(turtle).unwrap();
        Self {
            inner,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
            select_failing: AtomicBool::new(false),
        }
    }

    pub fn with_fixtures() -> Self {
        Self::new(FIXTURES)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Fail SELECT queries only; CONSTRUCT keeps working.
    pub fn set_select_failing(&self, failing: bool) {
        self.select_failing.store(failing, Ordering::SeqCst);
    }

    fn record(&self, query: &str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Http("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SparqlClient for SpySparqlClient {
    async fn select(&self, query: &str) -> Result<Vec<Binding>> {
        self.record(query)?;
        if self.select_failing.load(Ordering::SeqCst) {
            return Err(Error::Http("connection reset".to_string()));
        }
        self.inner.select(query).await
    }

    async fn construct(&self, query: &str) -> Result<Vec<Statement>> {
        self.record(query)?;
        self.inner.construct(query).await
    }
}

/// Search index answering with queued responses and recording request bodies.
#[derive(Default)]
pub struct MockSearchIndex {
    responses: Mutex<VecDeque<Result<Value>>>,
    requests: Mutex<Vec<(String, Value)>>,
}

impl MockSearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, response: Value) -> &Self {
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn fail(&self, error: Error) -> &Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchIndexClient for MockSearchIndex {
    async fn search(&self, index: &str, body: &Value) -> Result<Value> {
        self.requests.lock().unwrap().push((index.to_string(), body.clone()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Http("no response queued".to_string())))
    }
}

/// Search response with the given sources and facet buckets. Each facet is
/// `(name, global buckets, scoped buckets)`.
pub fn search_response(total: u64, sources: Vec<Value>, facets: &[(&str, Value, Value)]) -> Value {
    let hits: Vec<Value> = sources
        .into_iter()
        .enumerate()
        .map(|(i, source)| json!({"_id": i.to_string(), "_score": 1.0, "_source": source}))
        .collect();

    let mut all = serde_json::Map::new();
    all.insert("doc_count".to_string(), json!(100));
    let mut aggregations = serde_json::Map::new();
    for (name, global, scoped) in facets {
        all.insert(name.to_string(), json!({"buckets": global}));
        aggregations.insert(name.to_string(), json!({"buckets": scoped}));
    }
    aggregations.insert("all".to_string(), Value::Object(all));

    json!({
        "hits": {"total": {"value": total, "relation": "eq"}, "hits": hits},
        "aggregations": aggregations
    })
}

/// Response of an exact lookup.
pub fn lookup_response(sources: Vec<Value>) -> Value {
    let total = sources.len();
    let hits: Vec<Value> =
        sources.into_iter().map(|source| json!({"_id": "1", "_source": source})).collect();
    json!({"hits": {"total": {"value": total}, "hits": hits}})
}

/// Empty buckets for every facet name.
pub fn empty_facets<'a>(names: &[&'a str]) -> Vec<(&'a str, Value, Value)> {
    names.iter().map(|name| (*name, json!([]), json!([]))).collect()
}
