//! Provenance events (CIDOC-CRM acquisitions) of heritage objects and persons.
//!
//! Objects reach their events through `P24i_changed_ownership_through`; persons
//! through `P22i_acquired_title_through` and `P23i_surrendered_title_through`.
//! The CONSTRUCT queries materialise those inverse links so every requested IRI
//! is a subject of the returned graph. Names of event types, transfer parties
//! and places are resolved through the label fetcher.

use super::{EnrichmentProfile, LabelFetcher, ProvenanceEnrichment, ProvenanceEvent};
use crate::core::{vocab, Term};
use crate::sparql::{values_block, Resource, ResourceGraph};

const EVENT_LINKS_OBJECT: [&str; 1] = [vocab::CRM_P24I_CHANGED_OWNERSHIP_THROUGH];
const EVENT_LINKS_PERSON: [&str; 2] =
    [vocab::CRM_P22I_ACQUIRED_TITLE_THROUGH, vocab::CRM_P23I_SURRENDERED_TITLE_THROUGH];

/// Statements describing `?event`, shared by both profiles.
const EVENT_TEMPLATE: &str = r#"  ?event a crm:E8_Acquisition ;
    crm:P2_has_type ?type ;
    crm:P3_has_note ?description ;
    crm:P4_has_time-span ?timeSpan ;
    crm:P23_transferred_title_from ?from ;
    crm:P22_transferred_title_to ?to ;
    crm:P7_took_place_at ?location .
  ?timeSpan crm:P82a_begin_of_the_begin ?startDate ;
    crm:P82b_end_of_the_end ?endDate ."#;

const EVENT_PATTERN: &str = r#"  ?event a crm:E8_Acquisition .
  OPTIONAL { ?event crm:P2_has_type ?type }
  OPTIONAL { ?event crm:P3_has_note ?description }
  OPTIONAL {
    ?event crm:P4_has_time-span ?timeSpan .
    OPTIONAL { ?timeSpan crm:P82a_begin_of_the_begin ?startDate }
    OPTIONAL { ?timeSpan crm:P82b_end_of_the_end ?endDate }
  }
  OPTIONAL { ?event crm:P23_transferred_title_from ?from }
  OPTIONAL { ?event crm:P22_transferred_title_to ?to }
  OPTIONAL { ?event crm:P7_took_place_at ?location }"#;

const CRM_PREFIX: &str = "PREFIX crm: <http://www.cidoc-crm.org/cidoc-crm/>";

#[derive(Debug, Clone, Default)]
pub struct HeritageObjectProfile;

impl EnrichmentProfile for HeritageObjectProfile {
    type Record = ProvenanceEnrichment;

    const KIND: &'static str = "heritage-object";

    fn build_query(&self, iris: &[String]) -> String {
        format!(
            r#"{}
CONSTRUCT {{
  ?object crm:P24i_changed_ownership_through ?event .
{}
}}
WHERE {{
  {}
  ?event crm:P24_transferred_title_of ?object .
{}
}}"#,
            CRM_PREFIX,
            EVENT_TEMPLATE,
            values_block("object", iris),
            EVENT_PATTERN
        )
    }

    fn label_iris(&self, graph: &ResourceGraph) -> Vec<String> {
        event_label_iris(graph, &EVENT_LINKS_OBJECT)
    }

    fn build_record(
        &self,
        resource: Resource<'_>,
        labels: Option<&LabelFetcher>,
    ) -> ProvenanceEnrichment {
        build_enrichment(resource, &EVENT_LINKS_OBJECT, labels)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PersonProfile;

impl EnrichmentProfile for PersonProfile {
    type Record = ProvenanceEnrichment;

    const KIND: &'static str = "person";

    fn build_query(&self, iris: &[String]) -> String {
        format!(
            r#"{}
CONSTRUCT {{
  ?person crm:P22i_acquired_title_through ?acquired .
  ?person crm:P23i_surrendered_title_through ?surrendered .
{}
}}
WHERE {{
  {}
  {{
    ?event crm:P22_transferred_title_to ?person .
    BIND(?event AS ?acquired)
  }} UNION {{
    ?event crm:P23_transferred_title_from ?person .
    BIND(?event AS ?surrendered)
  }}
{}
}}"#,
            CRM_PREFIX,
            EVENT_TEMPLATE,
            values_block("person", iris),
            EVENT_PATTERN
        )
    }

    fn label_iris(&self, graph: &ResourceGraph) -> Vec<String> {
        event_label_iris(graph, &EVENT_LINKS_PERSON)
    }

    fn build_record(
        &self,
        resource: Resource<'_>,
        labels: Option<&LabelFetcher>,
    ) -> ProvenanceEnrichment {
        build_enrichment(resource, &EVENT_LINKS_PERSON, labels)
    }
}

/// Events reachable from `resource` through any of `links`, in link order,
/// without duplicates.
fn linked_events<'a>(resource: Resource<'a>, links: &[&'static str]) -> Vec<Resource<'a>> {
    let mut events: Vec<Resource<'a>> = Vec::new();
    for link in links {
        for event in resource.related_all(*link) {
            if event.has_type(vocab::CRM_E8_ACQUISITION)
                && !events.iter().any(|e| e.id() == event.id())
            {
                events.push(event);
            }
        }
    }
    events
}

/// Every IRI whose label is shown with an event: types, parties and places.
fn event_label_iris(graph: &ResourceGraph, links: &[&'static str]) -> Vec<String> {
    let mut iris = Vec::new();
    let subjects = graph_subjects_with_links(graph, links);

    for subject in subjects {
        for event in linked_events(subject, links) {
            iris.extend(event.iris(vocab::CRM_P2_HAS_TYPE).into_iter().map(str::to_string));
            for predicate in [
                vocab::CRM_P23_TRANSFERRED_TITLE_FROM,
                vocab::CRM_P22_TRANSFERRED_TITLE_TO,
                vocab::CRM_P7_TOOK_PLACE_AT,
            ] {
                if let Some(iri) = event.iri(predicate) {
                    iris.push(iri.to_string());
                }
            }
        }
    }

    iris
}

fn graph_subjects_with_links<'a>(
    graph: &'a ResourceGraph,
    links: &[&'static str],
) -> Vec<Resource<'a>> {
    graph
        .subjects()
        .filter(|resource| {
            links
                .iter()
                .any(|link| resource.objects(*link).next().is_some())
        })
        .collect()
}

fn build_enrichment(
    resource: Resource<'_>,
    links: &[&'static str],
    labels: Option<&LabelFetcher>,
) -> ProvenanceEnrichment {
    let mut events: Vec<ProvenanceEvent> = linked_events(resource, links)
        .into_iter()
        .map(|event| build_event(event, labels))
        .collect();

    // Chronological; undated events last, otherwise graph order
    events.sort_by(|a, b| match (&a.start_date, &b.start_date) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    ProvenanceEnrichment {
        id: resource.id().to_string(),
        subject_of: events,
    }
}

fn build_event(event: Resource<'_>, labels: Option<&LabelFetcher>) -> ProvenanceEvent {
    let term = |iri: &str| {
        let name = labels.map_or_else(|| iri.to_string(), |l| l.name_or_iri(iri));
        Term::new(iri, name)
    };
    let time_span = event.related(vocab::CRM_P4_HAS_TIME_SPAN);

    ProvenanceEvent {
        id: event.id().to_string(),
        types: event.iris(vocab::CRM_P2_HAS_TYPE).into_iter().map(term).collect(),
        start_date: time_span
            .and_then(|span| span.literal(vocab::CRM_P82A_BEGIN_OF_THE_BEGIN))
            .map(str::to_string),
        end_date: time_span
            .and_then(|span| span.literal(vocab::CRM_P82B_END_OF_THE_END))
            .map(str::to_string),
        description: event.literal(vocab::CRM_P3_HAS_NOTE).map(str::to_string),
        transferred_from: event.iri(vocab::CRM_P23_TRANSFERRED_TITLE_FROM).map(term),
        transferred_to: event.iri(vocab::CRM_P22_TRANSFERRED_TITLE_TO).map(term),
        location: event.iri(vocab::CRM_P7_TOOK_PLACE_AT).map(term),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparql::{RdfTerm, Statement};

    const OBJECT: &str = "https://example.org/objects/1";

    fn iri(value: &str) -> RdfTerm {
        RdfTerm::Iri(value.to_string())
    }

    fn event(statements: &mut Vec<Statement>, id: &str, start: Option<&str>) {
        let event = format!("https://example.org/events/{}", id);
        let e = event.as_str();
        statements.extend([
            Statement::new(OBJECT, vocab::CRM_P24I_CHANGED_OWNERSHIP_THROUGH, iri(e)),
            Statement::new(e, vocab::RDF_TYPE, iri(vocab::CRM_E8_ACQUISITION)),
            Statement::new(e, vocab::CRM_P2_HAS_TYPE, iri("https://example.org/types/purchase")),
            Statement::new(
                e,
                vocab::CRM_P23_TRANSFERRED_TITLE_FROM,
                iri("https://example.org/persons/seller"),
            ),
            Statement::new(
                e,
                vocab::CRM_P22_TRANSFERRED_TITLE_TO,
                iri("https://example.org/persons/buyer"),
            ),
        ]);
        if let Some(start) = start {
            let span = format!("{}/time-span", event);
            statements.push(Statement::new(e, vocab::CRM_P4_HAS_TIME_SPAN, iri(&span)));
            statements.push(Statement::new(
                span.as_str(),
                vocab::CRM_P82A_BEGIN_OF_THE_BEGIN,
                RdfTerm::literal(start),
            ));
        }
    }

    #[test]
    fn test_events_are_chronological_with_undated_last() {
        let mut statements = Vec::new();
        event(&mut statements, "undated", None);
        event(&mut statements, "late", Some("1901-01-01"));
        event(&mut statements, "early", Some("1850-05-01"));

        let graph = ResourceGraph::from_statements(statements);
        let record = HeritageObjectProfile.build_record(graph.resource(OBJECT).unwrap(), None);

        let ids: Vec<&str> = record.subject_of.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "https://example.org/events/early",
                "https://example.org/events/late",
                "https://example.org/events/undated",
            ]
        );
        assert_eq!(record.subject_of[0].start_date.as_deref(), Some("1850-05-01"));
    }

    #[test]
    fn test_names_fall_back_to_iris_without_labels() {
        let mut statements = Vec::new();
        event(&mut statements, "1", Some("1900"));

        let graph = ResourceGraph::from_statements(statements);
        let record = HeritageObjectProfile.build_record(graph.resource(OBJECT).unwrap(), None);
        let event = &record.subject_of[0];

        assert_eq!(
            event.types,
            vec![Term::new(
                "https://example.org/types/purchase",
                "https://example.org/types/purchase"
            )]
        );
        assert_eq!(
            event.transferred_from.as_ref().map(|t| t.id.as_str()),
            Some("https://example.org/persons/seller")
        );
        assert!(event.location.is_none());
    }

    #[test]
    fn test_label_iris_cover_types_parties_and_places() {
        let mut statements = Vec::new();
        event(&mut statements, "1", None);
        statements.push(Statement::new(
            "https://example.org/events/1",
            vocab::CRM_P7_TOOK_PLACE_AT,
            iri("https://example.org/places/batavia"),
        ));

        let graph = ResourceGraph::from_statements(statements);
        let iris = HeritageObjectProfile.label_iris(&graph);

        assert!(iris.contains(&"https://example.org/types/purchase".to_string()));
        assert!(iris.contains(&"https://example.org/persons/seller".to_string()));
        assert!(iris.contains(&"https://example.org/persons/buyer".to_string()));
        assert!(iris.contains(&"https://example.org/places/batavia".to_string()));
    }

    #[test]
    fn test_person_query_links_both_roles() {
        let query = PersonProfile.build_query(&["https://example.org/persons/1".to_string()]);
        assert!(query.contains("?person crm:P22i_acquired_title_through ?acquired"));
        assert!(query.contains("?person crm:P23i_surrendered_title_through ?surrendered"));
        assert!(query.contains("VALUES ?person { <https://example.org/persons/1> }"));
    }
}
