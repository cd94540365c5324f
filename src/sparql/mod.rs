//! Graph store access.
//!
//! [`SparqlClient`] is the seam the label fetcher and the enrichers talk to. Two
//! implementations are provided: [`HttpSparqlClient`] for remote SPARQL 1.1
//! protocol endpoints and [`StoreSparqlClient`] backed by an embedded Oxigraph
//! store.

use async_trait::async_trait;
use oxigraph::model::Term;
use serde::Serialize;
use std::collections::HashMap;

use crate::error::Result;

pub mod graph;
pub mod http;
pub mod store;

pub use graph::{Resource, ResourceGraph};
pub use http::{HttpSparqlClient, SparqlEndpoint};
pub use store::StoreSparqlClient;

/// An RDF term as returned by the graph store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RdfTerm {
    Iri(String),
    BlankNode(String),
    Literal {
        value: String,
        datatype: Option<String>,
        language: Option<String>,
    },
}

impl RdfTerm {
    pub fn literal(value: impl Into<String>) -> Self {
        RdfTerm::Literal {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    /// Lexical value: the IRI, the blank node id or the literal value.
    pub fn value(&self) -> &str {
        match self {
            RdfTerm::Iri(iri) => iri,
            RdfTerm::BlankNode(id) => id,
            RdfTerm::Literal { value, .. } => value,
        }
    }

    /// Key under which the node appears as a subject in a [`ResourceGraph`].
    /// Literals are never subjects.
    pub fn node_key(&self) -> Option<String> {
        match self {
            RdfTerm::Iri(iri) => Some(iri.clone()),
            RdfTerm::BlankNode(id) => Some(format!("_:{}", id)),
            RdfTerm::Literal { .. } => None,
        }
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            RdfTerm::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            RdfTerm::Literal { value, .. } => Some(value),
            _ => None,
        }
    }
}

impl From<&Term> for RdfTerm {
    fn from(term: &Term) -> Self {
        match term {
            Term::NamedNode(node) => RdfTerm::Iri(node.as_str().to_string()),
            Term::BlankNode(node) => RdfTerm::BlankNode(node.as_str().to_string()),
            Term::Literal(literal) => RdfTerm::Literal {
                value: literal.value().to_string(),
                datatype: Some(literal.datatype().as_str().to_string()),
                language: literal.language().map(str::to_string),
            },
            #[allow(unreachable_patterns)]
            other => RdfTerm::literal(other.to_string()),
        }
    }
}

/// One statement of a CONSTRUCT result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Subject IRI, or `_:id` for blank nodes
    pub subject: String,
    pub predicate: String,
    pub object: RdfTerm,
}

impl Statement {
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: RdfTerm) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        }
    }

    pub(crate) fn from_terms(subject: impl Into<Term>, predicate: &str, object: &Term) -> Self {
        let subject = RdfTerm::from(&subject.into());
        let subject = subject.node_key().unwrap_or_else(|| subject.value().to_string());
        Self {
            subject,
            predicate: predicate.to_string(),
            object: RdfTerm::from(object),
        }
    }
}

/// One solution of a SELECT query, keyed by variable name.
pub type Binding = HashMap<String, RdfTerm>;

/// Client able to run SELECT and CONSTRUCT queries against a graph store.
#[async_trait]
pub trait SparqlClient: Send + Sync {
    /// Run a SELECT query and return its solutions.
    async fn select(&self, query: &str) -> Result<Vec<Binding>>;

    /// Run a CONSTRUCT query and return the statements of the resulting graph.
    async fn construct(&self, query: &str) -> Result<Vec<Statement>>;
}

/// Render a `VALUES` block binding `variable` to the given IRIs.
/// Callers pass IRIs that were validated beforehand.
pub fn values_block(variable: &str, iris: &[String]) -> String {
    let values: Vec<String> = iris.iter().map(|iri| format!("<{}>", iri)).collect();
    format!("VALUES ?{} {{ {} }}", variable, values.join(" "))
}
