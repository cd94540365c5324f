//! Quality measurements of datasets (W3C Data Quality Vocabulary).

use super::{DatasetEnrichment, EnrichmentProfile, LabelFetcher, Measurement, Metric};
use crate::core::vocab;
use crate::sparql::{values_block, Resource};

#[derive(Debug, Clone, Default)]
pub struct DatasetProfile;

impl EnrichmentProfile for DatasetProfile {
    type Record = DatasetEnrichment;

    const KIND: &'static str = "dataset";

    fn build_query(&self, iris: &[String]) -> String {
        format!(
            r#"PREFIX dqv: <http://www.w3.org/ns/dqv#>
PREFIX schema: <https://schema.org/>
CONSTRUCT {{
  ?dataset dqv:hasQualityMeasurement ?measurement .
  ?measurement dqv:isMeasurementOf ?metric ;
    dqv:value ?value .
  ?metric schema:name ?metricName ;
    schema:position ?order .
}}
WHERE {{
  {}
  ?dataset dqv:hasQualityMeasurement ?measurement .
  ?measurement dqv:isMeasurementOf ?metric ;
    dqv:value ?value .
  OPTIONAL {{ ?metric schema:name ?metricName }}
  OPTIONAL {{ ?metric schema:position ?order }}
}}"#,
            values_block("dataset", iris)
        )
    }

    fn build_record(
        &self,
        resource: Resource<'_>,
        _labels: Option<&LabelFetcher>,
    ) -> DatasetEnrichment {
        let mut measurements: Vec<Measurement> = resource
            .related_all(vocab::DQV_HAS_QUALITY_MEASUREMENT)
            .into_iter()
            .filter_map(build_measurement)
            .collect();

        // Stable: equal orders keep their graph order
        measurements.sort_by_key(|measurement| measurement.metric.order.unwrap_or(i64::MAX));

        DatasetEnrichment {
            id: resource.id().to_string(),
            measurements,
        }
    }
}

fn build_measurement(measurement: Resource<'_>) -> Option<Measurement> {
    let metric_id = measurement
        .objects(vocab::DQV_IS_MEASUREMENT_OF)
        .find_map(|o| o.node_key())?;
    let metric = measurement.related(vocab::DQV_IS_MEASUREMENT_OF);

    let name = metric
        .and_then(|metric| metric.literal(vocab::SCHEMA_NAME))
        .map(str::to_string)
        .unwrap_or_else(|| metric_id.clone());
    let order = metric
        .and_then(|metric| metric.literal(vocab::SCHEMA_POSITION))
        .and_then(|position| position.trim().parse::<i64>().ok());

    Some(Measurement {
        id: measurement.id().to_string(),
        value: parse_measurement_value(measurement.literal(vocab::DQV_VALUE)),
        metric: Metric {
            id: metric_id,
            name,
            order,
        },
    })
}

/// Only binary measurements are supported: the literal `"true"` is true, anything else false.
pub fn parse_measurement_value(literal: Option<&str>) -> bool {
    literal == Some("true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparql::{RdfTerm, ResourceGraph, Statement};

    const DATASET: &str = "https://example.org/datasets/1";

    fn measurement(
        statements: &mut Vec<Statement>,
        id: &str,
        value: &str,
        metric: &str,
        order: Option<&str>,
    ) {
        let measurement = format!("https://example.org/measurements/{}", id);
        let metric_iri = format!("https://example.org/metrics/{}", metric);
        statements.push(Statement::new(
            DATASET,
            vocab::DQV_HAS_QUALITY_MEASUREMENT,
            RdfTerm::Iri(measurement.clone()),
        ));
        statements.push(Statement::new(
            measurement.as_str(),
            vocab::DQV_IS_MEASUREMENT_OF,
            RdfTerm::Iri(metric_iri.clone()),
        ));
        statements.push(Statement::new(
            measurement.as_str(),
            vocab::DQV_VALUE,
            RdfTerm::literal(value),
        ));
        statements.push(Statement::new(
            metric_iri.as_str(),
            vocab::SCHEMA_NAME,
            RdfTerm::literal(format!("Metric {}", metric)),
        ));
        if let Some(order) = order {
            statements.push(Statement::new(
                metric_iri.as_str(),
                vocab::SCHEMA_POSITION,
                RdfTerm::literal(order),
            ));
        }
    }

    fn build(statements: Vec<Statement>) -> DatasetEnrichment {
        let graph = ResourceGraph::from_statements(statements);
        DatasetProfile.build_record(graph.resource(DATASET).unwrap(), None)
    }

    #[test]
    fn test_measurements_sorted_by_metric_order() {
        let mut statements = Vec::new();
        measurement(&mut statements, "m3", "true", "c", Some("3"));
        measurement(&mut statements, "m1", "false", "a", Some("1"));
        measurement(&mut statements, "m2", "true", "b", Some("2"));

        let record = build(statements);
        let orders: Vec<Option<i64>> =
            record.measurements.iter().map(|m| m.metric.order).collect();
        assert_eq!(orders, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(record.measurements[0].metric.name, "Metric a");
        assert!(!record.measurements[0].value);
        assert!(record.measurements[1].value);
    }

    #[test]
    fn test_equal_orders_keep_input_order() {
        let mut statements = Vec::new();
        measurement(&mut statements, "x", "true", "x", Some("1"));
        measurement(&mut statements, "late", "true", "late", None);
        measurement(&mut statements, "y", "true", "y", Some("1"));
        measurement(&mut statements, "first", "true", "first", Some("0"));

        let record = build(statements);
        let metrics: Vec<&str> = record
            .measurements
            .iter()
            .map(|m| m.metric.name.as_str())
            .collect();
        assert_eq!(
            metrics,
            vec!["Metric first", "Metric x", "Metric y", "Metric late"]
        );
    }

    #[test]
    fn test_measurement_values() {
        assert!(parse_measurement_value(Some("true")));
        assert!(!parse_measurement_value(Some("false")));
        assert!(!parse_measurement_value(Some("1")));
        assert!(!parse_measurement_value(Some("TRUE")));
        assert!(!parse_measurement_value(None));
    }

    #[test]
    fn test_query_binds_all_datasets() {
        let query = DatasetProfile.build_query(&[
            "https://example.org/datasets/1".to_string(),
            "https://example.org/datasets/2".to_string(),
        ]);
        assert!(query.starts_with("PREFIX dqv:"));
        assert!(query.contains(
            "VALUES ?dataset { <https://example.org/datasets/1> <https://example.org/datasets/2> }"
        ));
    }
}
