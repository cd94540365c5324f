//! In-memory view of a CONSTRUCT result, grouped by subject.

use std::collections::HashMap;

use super::{RdfTerm, Statement};
use crate::core::vocab;

/// Statements grouped by subject. The order in which statements arrived is
/// preserved per subject.
#[derive(Debug, Default, Clone)]
pub struct ResourceGraph {
    resources: HashMap<String, Vec<(String, RdfTerm)>>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_statements<I>(statements: I) -> Self
    where
        I: IntoIterator<Item = Statement>,
    {
        let mut graph = Self::new();
        for statement in statements {
            graph.insert(statement);
        }
        graph
    }

    pub fn insert(&mut self, statement: Statement) {
        let properties = self.resources.entry(statement.subject).or_default();
        let property = (statement.predicate, statement.object);
        if !properties.contains(&property) {
            properties.push(property);
        }
    }

    pub fn contains(&self, subject: &str) -> bool {
        self.resources.contains_key(subject)
    }

    pub fn resource<'a>(&'a self, subject: &'a str) -> Option<Resource<'a>> {
        self.resources.get(subject).map(|properties| Resource {
            graph: self,
            id: subject,
            properties,
        })
    }

    /// Every subject of the graph, in no particular order.
    pub fn subjects(&self) -> impl Iterator<Item = Resource<'_>> + '_ {
        self.resources
            .iter()
            .map(move |(id, properties)| Resource {
                graph: self,
                id: id.as_str(),
                properties,
            })
    }

    /// Number of distinct subjects
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// A subject of a [`ResourceGraph`] together with its properties.
#[derive(Debug, Clone, Copy)]
pub struct Resource<'a> {
    graph: &'a ResourceGraph,
    id: &'a str,
    properties: &'a [(String, RdfTerm)],
}

impl<'a> Resource<'a> {
    pub fn id(&self) -> &'a str {
        self.id
    }

    /// All objects of `predicate`, in statement order.
    pub fn objects(&self, predicate: &'a str) -> impl Iterator<Item = &'a RdfTerm> + 'a {
        let properties = self.properties;
        properties.iter().filter(move |(p, _)| p == predicate).map(|(_, object)| object)
    }

    pub fn literal(&self, predicate: &'a str) -> Option<&'a str> {
        self.objects(predicate).find_map(RdfTerm::as_literal)
    }

    pub fn iri(&self, predicate: &'a str) -> Option<&'a str> {
        self.objects(predicate).find_map(RdfTerm::as_iri)
    }

    pub fn iris(&self, predicate: &'a str) -> Vec<&'a str> {
        self.objects(predicate).filter_map(RdfTerm::as_iri).collect()
    }

    /// Follow `predicate` to the first object that is itself a subject in the graph.
    pub fn related(&self, predicate: &'a str) -> Option<Resource<'a>> {
        self.related_all(predicate).into_iter().next()
    }

    /// Follow `predicate` to every object that is itself a subject in the graph.
    pub fn related_all(&self, predicate: &'a str) -> Vec<Resource<'a>> {
        let graph = self.graph;
        self.objects(predicate)
            .filter_map(|object| {
                let key = object.node_key()?;
                let (id, properties) = graph.resources.get_key_value(key.as_str())?;
                Some(Resource {
                    graph,
                    id: id.as_str(),
                    properties,
                })
            })
            .collect()
    }

    pub fn has_type(&self, class: &str) -> bool {
        self.objects(vocab::RDF_TYPE).any(|object| object.as_iri() == Some(class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EX: &str = "https://example.org/";

    fn iri(local: &str) -> RdfTerm {
        RdfTerm::Iri(format!("{}{}", EX, local))
    }

    fn sample_graph() -> ResourceGraph {
        ResourceGraph::from_statements(vec![
            Statement::new(format!("{}obj", EX), format!("{}event", EX), iri("e2")),
            Statement::new(format!("{}obj", EX), format!("{}event", EX), iri("e1")),
            Statement::new(format!("{}obj", EX), format!("{}event", EX), iri("missing")),
            Statement::new(format!("{}e1", EX), format!("{}note", EX), RdfTerm::literal("first")),
            Statement::new(format!("{}e2", EX), format!("{}note", EX), RdfTerm::literal("second")),
            Statement::new(format!("{}e2", EX), format!("{}note", EX), RdfTerm::literal("second")),
        ])
    }

    #[test]
    fn test_groups_by_subject() {
        let graph = sample_graph();
        assert_eq!(graph.len(), 3);
        assert!(graph.contains("https://example.org/obj"));
        assert!(!graph.contains("https://example.org/missing"));
    }

    #[test]
    fn test_related_keeps_statement_order_and_skips_dangling() {
        let graph = sample_graph();
        let object = graph.resource("https://example.org/obj").unwrap();
        let events = object.related_all("https://example.org/event");
        let ids: Vec<&str> = events.iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec!["https://example.org/e2", "https://example.org/e1"]);
        assert_eq!(events[0].literal("https://example.org/note"), Some("second"));
    }

    #[test]
    fn test_duplicate_statements_are_collapsed() {
        let graph = sample_graph();
        let event = graph.resource("https://example.org/e2").unwrap();
        assert_eq!(event.objects("https://example.org/note").count(), 1);
    }
}
