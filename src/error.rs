//! Error types for search and enrichment operations

use thiserror::Error;

/// Result type alias for heritage-search operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for heritage-search operations
#[derive(Error, Debug)]
pub enum Error {
    /// Transport error talking to the search index or the SPARQL endpoint
    #[error("HTTP error: {0}")]
    Http(String),

    /// Remote service answered with a non-success status
    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The search index answered with a body that does not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// SPARQL query evaluation error
    #[error("SPARQL error: {0}")]
    Sparql(String),

    /// RDF parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Http(_) => true,
            Error::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidResponse(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<oxigraph::io::RdfParseError> for Error {
    fn from(err: oxigraph::io::RdfParseError) -> Self {
        Error::Parse(err.to_string())
    }
}

impl From<oxigraph::store::StorageError> for Error {
    fn from(err: oxigraph::store::StorageError) -> Self {
        Error::Sparql(err.to_string())
    }
}

impl From<oxigraph::sparql::QueryEvaluationError> for Error {
    fn from(err: oxigraph::sparql::QueryEvaluationError) -> Self {
        Error::Sparql(err.to_string())
    }
}
