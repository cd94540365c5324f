//! Best-effort enrichment of search hits with data from the graph store.
//!
//! Labels are resolved by the [`LabelFetcher`]; structured partial records
//! (quality measurements, provenance events) by an [`Enricher`] parameterised
//! with an [`EnrichmentProfile`]. Both batch their lookups into one query per
//! call, remember negative results, and swallow transport failures.

use serde::Serialize;

pub mod datasets;
pub mod enricher;
pub mod labels;
pub mod provenance;

pub use datasets::DatasetProfile;
pub use enricher::{Enricher, EnrichmentProfile};
pub use labels::LabelFetcher;
pub use provenance::{HeritageObjectProfile, PersonProfile};

use crate::core::Term;

pub type DatasetEnricher = Enricher<DatasetProfile>;
pub type HeritageObjectEnricher = Enricher<HeritageObjectProfile>;
pub type PersonEnricher = Enricher<PersonProfile>;

/// A quality metric a dataset is measured against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    pub id: String,
    pub name: String,
    /// Display position; metrics without one sort last
    pub order: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Measurement {
    pub id: String,
    pub value: bool,
    pub metric: Metric,
}

/// Enrichment of a dataset: its quality measurements, ordered by metric order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetEnrichment {
    pub id: String,
    pub measurements: Vec<Measurement>,
}

/// A change of ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceEvent {
    pub id: String,
    pub types: Vec<Term>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub transferred_from: Option<Term>,
    pub transferred_to: Option<Term>,
    pub location: Option<Term>,
}

/// Enrichment of a heritage object or person: the provenance events it is subject of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceEnrichment {
    pub id: String,
    pub subject_of: Vec<ProvenanceEvent>,
}
