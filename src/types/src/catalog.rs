//! Device catalog as declared in the experiment YAML documents. Field names
//! mirror the camelCase keys of the source format.

use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Catalog {
    // BTreeMap keeps device iteration order stable between runs.
    #[serde(default)]
    pub devices: BTreeMap<String, Device>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub name: Option<String>,
    pub short_name: Option<String>,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(rename = "movesense_whiteboard")]
    pub movesense_whiteboard: Option<Whiteboard>,
}

#[derive(Debug, Deserialize)]
pub struct Service {
    pub uuid: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub characteristics: Vec<Characteristic>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Characteristic {
    pub uuid: Option<String>,
    pub name: Option<String>,
    pub mqtt_topic: Option<String>,
    pub struct_parser: Option<StructParser>,
}

/// Decoder description for fixed-format binary payloads.
#[derive(Debug, Deserialize)]
pub struct StructParser {
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

#[derive(Debug, Deserialize)]
pub struct Whiteboard {
    #[serde(default)]
    pub measures: Vec<Measure>,
}

/// A whiteboard data source. Exactly one parser block is expected; a measure
/// with none is skipped during translation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measure {
    pub name: Option<String>,
    pub mqtt_topic: Option<String>,
    pub json_payload_parser: Option<JsonPayloadParser>,
    pub json_array_parser: Option<JsonArrayParser>,
    pub single_measurement_parser: Option<SingleMeasurementParser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonPayloadParser {
    #[serde(default)]
    pub use_jq: bool,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonArrayParser {
    pub array_path: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

#[derive(Debug, Deserialize)]
pub struct SingleMeasurementParser {
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub path: Option<String>,
    #[serde(rename = "type")]
    pub field_type: Option<FieldType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Integer,
    Float,
}
