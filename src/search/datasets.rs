//! Dataset search.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::facets::{bucket_iris, facet_filters, Facet};
use super::options::{SearchOptions, SearchParams, SortField};
use super::Index;
use crate::core::{SearchResult, Term};
use crate::enrichment::{DatasetEnricher, LabelFetcher, Measurement};
use crate::error::Result;

pub const DATASET_FACETS: [Facet; 5] = [
    Facet::pair("publishers", "publisher.id", "publisher.name"),
    Facet::iri("licenses", "license"),
    Facet::literal("keywords", "keywords"),
    Facet::iri("genres", "genres"),
    Facet::iri("spatialCoverages", "spatialCoverages"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DatasetSortBy {
    #[default]
    Relevance,
    Name,
}

impl SortField for DatasetSortBy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "relevance" => Some(DatasetSortBy::Relevance),
            "name" => Some(DatasetSortBy::Name),
            _ => None,
        }
    }

    fn index_field(&self) -> &'static str {
        match self {
            DatasetSortBy::Relevance => "_score",
            DatasetSortBy::Name => "name.keyword",
        }
    }
}

/// Dataset as stored in the index. Licenses, genres and spatial coverages
/// are bare IRIs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatasetDocument {
    iri: String,
    name: String,
    description: Option<String>,
    license: Option<String>,
    publisher: Term,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(default)]
    spatial_coverages: Vec<String>,
    date_created: Option<String>,
    date_published: Option<String>,
}

impl DatasetDocument {
    fn label_iris(&self) -> impl Iterator<Item = &str> {
        self.license
            .as_deref()
            .into_iter()
            .chain(self.genres.iter().map(String::as_str))
            .chain(self.spatial_coverages.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub license: Option<Term>,
    pub publisher: Term,
    pub keywords: Vec<String>,
    pub genres: Vec<Term>,
    pub spatial_coverages: Vec<Term>,
    pub date_created: Option<String>,
    pub date_published: Option<String>,
    pub measurements: Vec<Measurement>,
}

pub struct DatasetFetcher {
    index: Index,
    labels: Arc<LabelFetcher>,
    enricher: Arc<DatasetEnricher>,
}

impl DatasetFetcher {
    pub fn new(index: Index, labels: Arc<LabelFetcher>, enricher: Arc<DatasetEnricher>) -> Self {
        Self {
            index,
            labels,
            enricher,
        }
    }

    pub async fn search(
        &self,
        options: &SearchOptions,
    ) -> Result<SearchResult<Dataset, DatasetSortBy>> {
        let params = SearchParams::<DatasetSortBy>::from_options(options, &DATASET_FACETS);
        let (hits, total_count, aggregations) = self
            .index
            .search::<DatasetDocument, _>(&params, &DATASET_FACETS)
            .await?;

        let mut iris: Vec<String> = hits
            .iter()
            .flat_map(|hit| hit.source.label_iris())
            .map(str::to_string)
            .collect();
        iris.extend(bucket_iris(&aggregations, &DATASET_FACETS));
        self.labels.load(iris).await;

        let filters = facet_filters(&aggregations, &DATASET_FACETS, &self.labels)?;

        self.enricher
            .load_by_iris(hits.iter().map(|hit| hit.source.iri.as_str()))
            .await;

        let items = hits
            .into_iter()
            .map(|hit| self.to_dataset(hit.source))
            .collect();

        Ok(SearchResult {
            total_count,
            offset: params.offset,
            limit: params.limit,
            sort_by: params.sort_by,
            sort_order: params.sort_order,
            items,
            filters,
        })
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Dataset>> {
        let Some(document) = self.index.lookup::<DatasetDocument>(id).await? else {
            return Ok(None);
        };

        self.labels.load(document.label_iris()).await;
        self.enricher.load_by_iris([document.iri.as_str()]).await;

        Ok(Some(self.to_dataset(document)))
    }

    fn to_dataset(&self, document: DatasetDocument) -> Dataset {
        let term = |iri: &String| Term::new(iri.as_str(), self.labels.name_or_iri(iri));
        let measurements = self
            .enricher
            .get_by_iri(&document.iri)
            .map(|enrichment| enrichment.measurements)
            .unwrap_or_default();

        Dataset {
            license: document.license.as_ref().map(term),
            genres: document.genres.iter().map(term).collect(),
            spatial_coverages: document.spatial_coverages.iter().map(term).collect(),
            id: document.iri,
            name: document.name,
            description: document.description,
            publisher: document.publisher,
            keywords: document.keywords,
            date_created: document.date_created,
            date_published: document.date_published,
            measurements,
        }
    }
}
