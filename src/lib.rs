//! # Heritage Search
//!
//! Faceted search over the datasets, heritage objects and persons published by
//! a cultural-heritage data consortium, enriched with labels, quality
//! measurements and provenance events from a SPARQL endpoint.
//!
//! ## Features
//!
//! - Stable facet vocabularies with per-query counts
//! - Batched, cached label and enrichment lookups with negative caching
//! - Best-effort enrichment: graph store failures never fail a search
//!
//! ## Example
//!
//! ```no_run
//! use heritage_search::config::{Config, Services};
//! use heritage_search::search::SearchOptions;
//!
//! async fn example() -> heritage_search::Result<()> {
//!     let services = Services::from_config(&Config::from_env()?)?;
//!     let page = services.datasets.search(&SearchOptions::default().with_query("pottery")).await?;
//!     println!("{} datasets", page.total_count);
//!     Ok(())
//! }
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::new_without_default)]

/// Bounded LRU cache with negative entries
pub mod cache;

/// Core data structures and types
pub mod core;

/// Configuration and service wiring
pub mod config;

/// Label lookup and entity enrichment from the graph store
pub mod enrichment;

pub mod error;

/// HTTP API
pub mod http;

/// Faceted search against the search index
pub mod search;

/// SPARQL clients and CONSTRUCT result handling
pub mod sparql;

// Re-export commonly used types
pub use error::{Error, Result};
