//! Oxigraph-backed SPARQL client.
//!
//! Evaluates queries against an embedded in-memory store. Useful for offline
//! demos, fixtures and integration tests; behaves like a remote endpoint from
//! the caller's point of view.
//!
//! # Example
//!
//! ```ignore
//! use heritage_search::sparql::{SparqlClient, StoreSparqlClient};
//!
//! let client = StoreSparqlClient::new()?;
//! client.load_turtle(r#"
//!     @prefix schema: <https://schema.org/> .
//!     <https://example.org/amsterdam> schema:name "Amsterdam" .
//! "#)?;
//!
//! let bindings = client
//!     .select("SELECT ?name WHERE { ?s <https://schema.org/name> ?name }")
//!     .await?;
//! ```

use async_trait::async_trait;
use oxigraph::io::RdfFormat;
use oxigraph::model::Quad;
use oxigraph::sparql::{QueryResults, SparqlEvaluator};
use oxigraph::store::Store;

use super::{Binding, RdfTerm, SparqlClient, Statement};
use crate::error::{Error, Result};

pub struct StoreSparqlClient {
    store: Store,
}

impl StoreSparqlClient {
    pub fn new() -> Result<Self> {
        Ok(Self { store: Store::new()? })
    }

    pub fn from_store(store: Store) -> Self {
        Self { store }
    }

    /// Load Turtle data into the default graph.
    pub fn load_turtle(&self, data: &str) -> Result<()> {
        self.store
            .load_from_reader(RdfFormat::Turtle, data.as_bytes())
            .map_err(|e| Error::Parse(e.to_string()))
    }

    pub fn insert(&self, quad: &Quad) -> Result<()> {
        self.store.insert(quad)?;
        Ok(())
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}

#[async_trait]
impl SparqlClient for StoreSparqlClient {
    async fn select(&self, query: &str) -> Result<Vec<Binding>> {
        let evaluator = SparqlEvaluator::new();
        let parsed_query = evaluator.parse_query(query).map_err(|e| Error::Sparql(e.to_string()))?;
        let results = parsed_query.on_store(&self.store).execute()?;

        let mut bindings_list = Vec::new();

        if let QueryResults::Solutions(solutions) = results {
            for solution in solutions {
                let solution = solution?;
                let mut binding = Binding::new();

                for (var, term) in solution.iter() {
                    binding.insert(var.as_str().to_string(), RdfTerm::from(term));
                }

                bindings_list.push(binding);
            }
        } else {
            return Err(Error::Sparql("Query is not a SELECT query".to_string()));
        }

        Ok(bindings_list)
    }

    async fn construct(&self, query: &str) -> Result<Vec<Statement>> {
        let evaluator = SparqlEvaluator::new();
        let parsed_query = evaluator.parse_query(query).map_err(|e| Error::Sparql(e.to_string()))?;
        let results = parsed_query.on_store(&self.store).execute()?;

        let mut statements = Vec::new();

        if let QueryResults::Graph(triples) = results {
            for triple in triples {
                let triple = triple?;
                statements.push(Statement::from_terms(
                    triple.subject,
                    triple.predicate.as_str(),
                    &triple.object,
                ));
            }
        } else {
            return Err(Error::Sparql("Query is not a CONSTRUCT query".to_string()));
        }

        Ok(statements)
    }
}
