//! HTTP client for remote SPARQL endpoints (Apache Jena, Oxigraph server, GraphDB, ...)

use async_trait::async_trait;
use oxigraph::io::{RdfFormat, RdfParser};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use super::{Binding, RdfTerm, SparqlClient, Statement};
use crate::error::{Error, Result};

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";
const N_TRIPLES: &str = "application/n-triples";

/// Configuration for a SPARQL query endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparqlEndpoint {
    /// Full query URL, e.g. `https://example.org/repositories/heritage`
    pub url: String,
    pub auth_token: Option<String>,
    pub timeout_secs: u64,
}

impl SparqlEndpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            auth_token: None,
            timeout_secs: 30,
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }
}

/// Subset of the SPARQL 1.1 query results JSON format
#[derive(Debug, Deserialize)]
struct JsonResults {
    results: JsonBindings,
}

#[derive(Debug, Deserialize)]
struct JsonBindings {
    bindings: Vec<HashMap<String, JsonTerm>>,
}

#[derive(Debug, Deserialize)]
struct JsonTerm {
    #[serde(rename = "type")]
    kind: String,
    value: String,
    #[serde(rename = "xml:lang")]
    language: Option<String>,
    datatype: Option<String>,
}

impl From<JsonTerm> for RdfTerm {
    fn from(term: JsonTerm) -> Self {
        match term.kind.as_str() {
            "uri" => RdfTerm::Iri(term.value),
            "bnode" => RdfTerm::BlankNode(term.value),
            _ => RdfTerm::Literal {
                value: term.value,
                datatype: term.datatype,
                language: term.language,
            },
        }
    }
}

/// SPARQL protocol client. The query travels in the request body.
pub struct HttpSparqlClient {
    endpoint: SparqlEndpoint,
    client: Client,
}

impl HttpSparqlClient {
    pub fn new(endpoint: SparqlEndpoint) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(endpoint.timeout_secs))
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &SparqlEndpoint {
        &self.endpoint
    }

    /// POST the query and return the response body with its content type.
    async fn post_query(&self, query: &str, accept: &str) -> Result<(String, Option<String>)> {
        let request = self
            .client
            .post(&self.endpoint.url)
            .header("Content-Type", "application/sparql-query")
            .header("Accept", accept)
            .body(query.to_string());
        let request = self.add_auth_header(request);

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        Ok((body, content_type))
    }

    fn add_auth_header(&self, request: RequestBuilder) -> RequestBuilder {
        if let Some(token) = &self.endpoint.auth_token {
            request.header("Authorization", format!("Bearer {}", token))
        } else {
            request
        }
    }
}

#[async_trait]
impl SparqlClient for HttpSparqlClient {
    async fn select(&self, query: &str) -> Result<Vec<Binding>> {
        let (body, _) = self.post_query(query, SPARQL_RESULTS_JSON).await?;
        parse_select_results(&body)
    }

    async fn construct(&self, query: &str) -> Result<Vec<Statement>> {
        let (body, content_type) = self.post_query(query, N_TRIPLES).await?;
        parse_graph(&body, content_type.as_deref())
    }
}

/// Parse a SPARQL results JSON document into bindings.
pub fn parse_select_results(body: &str) -> Result<Vec<Binding>> {
    let results: JsonResults =
        serde_json::from_str(body).map_err(|e| Error::Parse(format!("SPARQL results: {}", e)))?;

    Ok(results
        .results
        .bindings
        .into_iter()
        .map(|row| row.into_iter().map(|(var, term)| (var, RdfTerm::from(term))).collect())
        .collect())
}

/// Parse an RDF graph serialization. The format follows the response content
/// type and falls back to N-Triples.
pub fn parse_graph(body: &str, content_type: Option<&str>) -> Result<Vec<Statement>> {
    let format = content_type
        .and_then(|ct| ct.split(';').next())
        .and_then(|media_type| RdfFormat::from_media_type(media_type.trim()))
        .unwrap_or(RdfFormat::NTriples);

    let mut statements = Vec::new();
    for quad in RdfParser::from_format(format).for_reader(body.as_bytes()) {
        let quad = quad?;
        statements.push(Statement::from_terms(quad.subject, quad.predicate.as_str(), &quad.object));
    }

    Ok(statements)
}
