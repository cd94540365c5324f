//! Heritage object search.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::facets::{facet_filters, Facet};
use super::options::{SearchOptions, SearchParams, SortField};
use super::Index;
use crate::core::{DatasetRef, SearchResult, Term};
use crate::enrichment::{HeritageObjectEnricher, LabelFetcher, ProvenanceEvent};
use crate::error::Result;

pub const HERITAGE_OBJECT_FACETS: [Facet; 8] = [
    Facet::pair("owners", "owner.id", "owner.name"),
    Facet::pair("types", "types.id", "types.name"),
    Facet::pair("subjects", "subjects.id", "subjects.name"),
    Facet::pair("locations", "locations.id", "locations.name"),
    Facet::pair("materials", "materials.id", "materials.name"),
    Facet::pair("techniques", "techniques.id", "techniques.name"),
    Facet::pair("creators", "creators.id", "creators.name"),
    Facet::pair("publishers", "isPartOf.publisher.id", "isPartOf.publisher.name"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HeritageObjectSortBy {
    #[default]
    Relevance,
    Name,
}

impl SortField for HeritageObjectSortBy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "relevance" => Some(HeritageObjectSortBy::Relevance),
            "name" => Some(HeritageObjectSortBy::Name),
            _ => None,
        }
    }

    fn index_field(&self) -> &'static str {
        match self {
            HeritageObjectSortBy::Relevance => "_score",
            HeritageObjectSortBy::Name => "name.keyword",
        }
    }
}

/// A heritage object. Everything but `subjectOf` comes from the index, where
/// referenced entities are stored with their names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeritageObject {
    #[serde(rename(deserialize = "iri"))]
    pub id: String,
    pub name: Option<String>,
    pub identifier: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub inscriptions: Vec<String>,
    #[serde(default)]
    pub types: Vec<Term>,
    #[serde(default)]
    pub subjects: Vec<Term>,
    #[serde(default)]
    pub locations: Vec<Term>,
    #[serde(default)]
    pub materials: Vec<Term>,
    #[serde(default)]
    pub techniques: Vec<Term>,
    #[serde(default)]
    pub creators: Vec<Term>,
    #[serde(default)]
    pub images: Vec<String>,
    pub owner: Option<Term>,
    pub is_part_of: DatasetRef,
    #[serde(skip_deserializing)]
    pub subject_of: Vec<ProvenanceEvent>,
}

pub struct HeritageObjectFetcher {
    index: Index,
    labels: Arc<LabelFetcher>,
    enricher: Arc<HeritageObjectEnricher>,
}

impl HeritageObjectFetcher {
    pub fn new(
        index: Index,
        labels: Arc<LabelFetcher>,
        enricher: Arc<HeritageObjectEnricher>,
    ) -> Self {
        Self {
            index,
            labels,
            enricher,
        }
    }

    pub async fn search(
        &self,
        options: &SearchOptions,
    ) -> Result<SearchResult<HeritageObject, HeritageObjectSortBy>> {
        let params = SearchParams::<HeritageObjectSortBy>::from_options(
            options,
            &HERITAGE_OBJECT_FACETS,
        );
        let (hits, total_count, aggregations) = self
            .index
            .search::<HeritageObject, _>(&params, &HERITAGE_OBJECT_FACETS)
            .await?;

        let filters = facet_filters(&aggregations, &HERITAGE_OBJECT_FACETS, &self.labels)?;

        self.enricher
            .load_by_iris(hits.iter().map(|hit| hit.source.id.as_str()))
            .await;

        let items = hits
            .into_iter()
            .map(|hit| self.enrich(hit.source))
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

    pub async fn get_by_id(&self, id: &str) -> Result<Option<HeritageObject>> {
        let Some(object) = self.index.lookup::<HeritageObject>(id).await? else {
            return Ok(None);
        };

        self.enricher.load_by_iris([object.id.as_str()]).await;
        Ok(Some(self.enrich(object)))
    }

    fn enrich(&self, mut object: HeritageObject) -> HeritageObject {
        if let Some(enrichment) = self.enricher.get_by_iri(&object.id) {
            object.subject_of = enrichment.subject_of;
        }
        object
    }
}
