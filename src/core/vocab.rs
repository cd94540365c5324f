//! RDF vocabulary IRIs used in enrichment queries

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
pub const SCHEMA_NAME: &str = "https://schema.org/name";
pub const SCHEMA_POSITION: &str = "https://schema.org/position";

// Data Quality Vocabulary
pub const DQV_HAS_QUALITY_MEASUREMENT: &str = "http://www.w3.org/ns/dqv#hasQualityMeasurement";
pub const DQV_IS_MEASUREMENT_OF: &str = "http://www.w3.org/ns/dqv#isMeasurementOf";
pub const DQV_VALUE: &str = "http://www.w3.org/ns/dqv#value";

// CIDOC-CRM
pub const CRM_E8_ACQUISITION: &str = "http://www.cidoc-crm.org/cidoc-crm/E8_Acquisition";
pub const CRM_P2_HAS_TYPE: &str = "http://www.cidoc-crm.org/cidoc-crm/P2_has_type";
pub const CRM_P3_HAS_NOTE: &str = "http://www.cidoc-crm.org/cidoc-crm/P3_has_note";
pub const CRM_P4_HAS_TIME_SPAN: &str = "http://www.cidoc-crm.org/cidoc-crm/P4_has_time-span";
pub const CRM_P7_TOOK_PLACE_AT: &str = "http://www.cidoc-crm.org/cidoc-crm/P7_took_place_at";
pub const CRM_P22I_ACQUIRED_TITLE_THROUGH: &str =
    "http://www.cidoc-crm.org/cidoc-crm/P22i_acquired_title_through";
pub const CRM_P23I_SURRENDERED_TITLE_THROUGH: &str =
    "http://www.cidoc-crm.org/cidoc-crm/P23i_surrendered_title_through";
pub const CRM_P24I_CHANGED_OWNERSHIP_THROUGH: &str =
    "http://www.cidoc-crm.org/cidoc-crm/P24i_changed_ownership_through";
pub const CRM_P22_TRANSFERRED_TITLE_TO: &str =
    "http://www.cidoc-crm.org/cidoc-crm/P22_transferred_title_to";
pub const CRM_P23_TRANSFERRED_TITLE_FROM: &str =
    "http://www.cidoc-crm.org/cidoc-crm/P23_transferred_title_from";
pub const CRM_P24_TRANSFERRED_TITLE_OF: &str =
    "http://www.cidoc-crm.org/cidoc-crm/P24_transferred_title_of";
pub const CRM_P82A_BEGIN_OF_THE_BEGIN: &str =
    "http://www.cidoc-crm.org/cidoc-crm/P82a_begin_of_the_begin";
pub const CRM_P82B_END_OF_THE_END: &str = "http://www.cidoc-crm.org/cidoc-crm/P82b_end_of_the_end";
