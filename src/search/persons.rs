//! Person search.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::facets::{facet_filters, Facet};
use super::options::{SearchOptions, SearchParams, SortField};
use super::Index;
use crate::core::{DatasetRef, SearchResult, Term};
use crate::enrichment::{LabelFetcher, PersonEnricher, ProvenanceEvent};
use crate::error::Result;

pub const PERSON_FACETS: [Facet; 8] = [
    Facet::pair("birthPlaces", "birthPlace.id", "birthPlace.name"),
    Facet::pair("deathPlaces", "deathPlace.id", "deathPlace.name"),
    Facet::pair("nationalities", "nationalities.id", "nationalities.name"),
    Facet::pair("occupations", "occupations.id", "occupations.name"),
    Facet::pair("genders", "gender.id", "gender.name"),
    Facet::pair("publishers", "isPartOf.publisher.id", "isPartOf.publisher.name"),
    Facet::literal("birthYears", "birthYear"),
    Facet::literal("deathYears", "deathYear"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PersonSortBy {
    #[default]
    Relevance,
    Name,
    BirthYear,
}

impl SortField for PersonSortBy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "relevance" => Some(PersonSortBy::Relevance),
            "name" => Some(PersonSortBy::Name),
            "birthyear" | "birth-year" | "birth_year" => Some(PersonSortBy::BirthYear),
            _ => None,
        }
    }

    fn index_field(&self) -> &'static str {
        match self {
            PersonSortBy::Relevance => "_score",
            PersonSortBy::Name => "name.keyword",
            PersonSortBy::BirthYear => "birthYear",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(rename(deserialize = "iri"))]
    pub id: String,
    pub name: String,
    pub birth_year: Option<i32>,
    pub birth_place: Option<Term>,
    pub death_year: Option<i32>,
    pub death_place: Option<Term>,
    pub gender: Option<Term>,
    #[serde(default)]
    pub nationalities: Vec<Term>,
    #[serde(default)]
    pub occupations: Vec<Term>,
    pub is_part_of: DatasetRef,
    /// Provenance events the person was a party to
    #[serde(skip_deserializing)]
    pub subject_of: Vec<ProvenanceEvent>,
}

pub struct PersonFetcher {
    index: Index,
    labels: Arc<LabelFetcher>,
    enricher: Arc<PersonEnricher>,
}

impl PersonFetcher {
    pub fn new(index: Index, labels: Arc<LabelFetcher>, enricher: Arc<PersonEnricher>) -> Self {
        Self {
            index,
            labels,
            enricher,
        }
    }

    pub async fn search(
        &self,
        options: &SearchOptions,
    ) -> Result<SearchResult<Person, PersonSortBy>> {
        let params = SearchParams::<PersonSortBy>::from_options(options, &PERSON_FACETS);
        let (hits, total_count, aggregations) = self
            .index
            .search::<Person, _>(&params, &PERSON_FACETS)
            .await?;

        let filters = facet_filters(&aggregations, &PERSON_FACETS, &self.labels)?;

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

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Person>> {
        let Some(person) = self.index.lookup::<Person>(id).await? else {
            return Ok(None);
        };

        self.enricher.load_by_iris([person.id.as_str()]).await;
        Ok(Some(self.enrich(person)))
    }

    fn enrich(&self, mut person: Person) -> Person {
        if let Some(enrichment) = self.enricher.get_by_iri(&person.id) {
            person.subject_of = enrichment.subject_of;
        }
        person
    }
}
