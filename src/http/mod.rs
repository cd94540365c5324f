//! HTTP API module
//!
//! Provides JSON endpoints for:
//! - Faceted search of datasets, heritage objects and persons
//! - Lookup of a single record by IRI

pub mod server;

pub use server::{
    create_server, start_server, ApiError, ErrorResponse, LookupQuery, SuccessResponse,
};
