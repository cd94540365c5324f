//! JSON request bodies for the search index.

use serde_json::{json, Map, Value};

use super::facets::{find_facet, Facet};
use super::options::{SearchParams, SortField, MATCH_ALL};
use super::response::GLOBAL_AGGREGATION;

/// Field holding the document IRI; also the secondary sort key.
pub const ID_FIELD: &str = "iri";

/// Request for one page of results with the facet aggregations.
///
/// The `all` global aggregation ignores query and filters and enumerates the
/// facet vocabulary; the top-level aggregations are scoped to the query.
pub fn build_search_request<S: SortField>(params: &SearchParams<S>, facets: &[Facet]) -> Value {
    let mut filter = Vec::new();
    for (name, values) in &params.filters {
        if let Some(facet) = find_facet(facets, name) {
            filter.push(json!({"terms": {facet.filter_field(): values}}));
        }
    }

    let mut aggregations = Map::new();
    for facet in facets {
        aggregations.insert(facet.name.to_string(), facet.aggregation());
    }

    let mut all = Map::new();
    all.insert("global".to_string(), json!({}));
    all.insert("aggregations".to_string(), Value::Object(aggregations.clone()));
    aggregations.insert(GLOBAL_AGGREGATION.to_string(), Value::Object(all));

    json!({
        "size": params.limit,
        "from": params.offset,
        "sort": [
            {params.sort_by.index_field(): {"order": params.sort_order.as_index_order()}},
            {ID_FIELD: {"order": "asc"}}
        ],
        "track_total_hits": true,
        "query": {
            "bool": {
                "must": [full_text_query(&params.query)],
                "filter": filter
            }
        },
        "aggregations": aggregations
    })
}

/// Free text uses the simple query syntax, which ignores invalid operators
/// instead of rejecting the request.
fn full_text_query(query: &str) -> Value {
    if query == MATCH_ALL {
        return json!({"match_all": {}});
    }
    json!({
        "simple_query_string": {
            "query": query,
            "default_operator": "and"
        }
    })
}

/// Exact lookup of one document by IRI. Asks for two hits so duplicates can
/// be detected.
pub fn build_lookup_request(id: &str) -> Value {
    json!({
        "size": 2,
        "track_total_hits": true,
        "query": {"term": {ID_FIELD: id}}
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SortOrder;
    use crate::search::options::SearchOptions;
    use serde::Serialize;

    #[derive(Debug, Clone, Copy, Default, Serialize)]
    struct ByName;

    impl SortField for ByName {
        fn parse(_: &str) -> Option<Self> {
            Some(ByName)
        }

        fn index_field(&self) -> &'static str {
            "name.keyword"
        }
    }

    const FACETS: [Facet; 2] = [
        Facet::pair("publishers", "publisher.id", "publisher.name"),
        Facet::iri("licenses", "license"),
    ];

    #[test]
    fn test_search_request_shape() {
        let options = SearchOptions {
            offset: Some(20),
            limit: Some(5),
            sort_order: Some("asc".into()),
            ..Default::default()
        }
        .with_filter("licenses", "https://example.org/l/1");
        let params: SearchParams<ByName> = SearchParams::from_options(&options, &FACETS);
        assert_eq!(params.sort_order, SortOrder::Ascending);

        let body = build_search_request(&params, &FACETS);

        assert_eq!(body["size"], 5);
        assert_eq!(body["from"], 20);
        assert_eq!(body["track_total_hits"], true);
        assert_eq!(body["sort"][0]["name.keyword"]["order"], "asc");
        assert_eq!(body["sort"][1]["iri"]["order"], "asc");
        assert!(body["query"]["bool"]["must"][0]["match_all"].is_object());
        assert_eq!(
            body["query"]["bool"]["filter"][0]["terms"]["license"][0],
            "https://example.org/l/1"
        );

        let aggregations = &body["aggregations"];
        assert!(aggregations["all"]["global"].is_object());
        assert!(aggregations["all"]["aggregations"]["publishers"]["multi_terms"].is_object());
        assert!(aggregations["licenses"]["terms"].is_object());
        assert!(aggregations["all"]["aggregations"].get("all").is_none());
    }

    #[test]
    fn test_malformed_query_syntax_is_passed_as_simple_query() {
        for text in ["\"unbalanced", "title:(", "pottery AND"] {
            let options = SearchOptions::default().with_query(text);
            let params: SearchParams<ByName> = SearchParams::from_options(&options, &FACETS);
            let body = build_search_request(&params, &FACETS);

            let must = &body["query"]["bool"]["must"][0];
            assert!(must.get("query_string").is_none());
            assert_eq!(must["simple_query_string"]["query"], text);
            assert_eq!(must["simple_query_string"]["default_operator"], "and");
        }
    }

    #[test]
    fn test_lookup_request() {
        let body = build_lookup_request("https://example.org/datasets/1");
        assert_eq!(body["size"], 2);
        assert_eq!(body["query"]["term"]["iri"], "https://example.org/datasets/1");
    }
}
