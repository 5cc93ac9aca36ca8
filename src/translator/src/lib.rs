//! Turns the device catalog into action/rule pairs for the broker. Sources
//! that cannot be named (missing shortName, name or topic) are skipped with a
//! warning so one bad entry never blocks the rest of the catalog.

pub mod query;
pub mod syntax;

use tracing::warn;
use types::{
    artifact::Artifact,
    catalog::{Catalog, Characteristic, FieldType, Measure},
};

pub fn translate(catalog: &Catalog) -> Vec<Artifact> {
    let mut artifacts = Vec::new();

    for (device_name, device) in &catalog.devices {
        let short_name = device
            .short_name
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_default();

        for service in &device.services {
            for characteristic in &service.characteristics {
                if characteristic.struct_parser.is_none() {
                    continue;
                }
                match characteristic_artifact(device_name, &short_name, characteristic) {
                    Some(artifact) => artifacts.push(artifact),
                    None => warn!(
                        "skipping characteristic in {device_name}: missing shortName, name or mqttTopic"
                    ),
                }
            }
        }

        if let Some(whiteboard) = &device.movesense_whiteboard {
            for measure in &whiteboard.measures {
                match measure_artifact(device_name, &short_name, measure) {
                    Some(artifact) => artifacts.push(artifact),
                    None => warn!(
                        "skipping measure in {device_name}: missing shortName, name, mqttTopic or parser"
                    ),
                }
            }
        }
    }

    artifacts
}

/// Lowercases and strips everything outside `[a-z0-9]`.
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

fn characteristic_artifact(
    device_name: &str,
    short_name: &str,
    characteristic: &Characteristic,
) -> Option<Artifact> {
    let parser = characteristic.struct_parser.as_ref()?;
    let source_name = characteristic.name.as_deref().unwrap_or_default();
    let measurement = measurement_name(short_name, source_name)?;
    let topic = non_empty(characteristic.mqtt_topic.as_deref())?;

    let sql = query::select_all(topic);
    let write_syntax = syntax::struct_write_syntax(&measurement, &parser.fields);
    Some(build(device_name, source_name, measurement, sql, write_syntax))
}

fn measure_artifact(device_name: &str, short_name: &str, measure: &Measure) -> Option<Artifact> {
    let source_name = measure.name.as_deref().unwrap_or_default();
    let measurement = measurement_name(short_name, source_name)?;
    let topic = non_empty(measure.mqtt_topic.as_deref())?;

    let (sql, write_syntax) = if let Some(parser) = &measure.json_payload_parser {
        (
            query::payload_select(topic, &parser.fields, parser.use_jq),
            syntax::aliased_write_syntax(&measurement, &parser.fields, FieldType::Float),
        )
    } else if let Some(parser) = &measure.json_array_parser {
        let array_path = non_empty(parser.array_path.as_deref())?;
        (
            query::foreach_select(topic, array_path, &parser.fields),
            syntax::aliased_write_syntax(&measurement, &parser.fields, FieldType::Integer),
        )
    } else if let Some(parser) = &measure.single_measurement_parser {
        (
            query::payload_select(topic, &parser.fields, false),
            syntax::aliased_write_syntax(&measurement, &parser.fields, FieldType::Float),
        )
    } else {
        return None;
    };

    Some(build(device_name, source_name, measurement, sql, write_syntax))
}

fn measurement_name(short_name: &str, source_name: &str) -> Option<String> {
    let cleaned = normalize(source_name);
    if short_name.is_empty() || cleaned.is_empty() {
        return None;
    }
    Some(format!("{short_name}_{cleaned}"))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn build(
    device_name: &str,
    source_name: &str,
    measurement: String,
    sql: String,
    write_syntax: String,
) -> Artifact {
    Artifact {
        action_name: format!("action_{measurement}"),
        action_description: format!("InfluxDB action for {device_name} - {source_name}"),
        rule_id: format!("rule_id_{measurement}"),
        rule_name: format!("rule_{measurement}"),
        rule_description: format!("Rule for {device_name} - {source_name}"),
        sql,
        write_syntax,
        measurement,
    }
}
