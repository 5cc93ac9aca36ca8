//! InfluxDB line-protocol templates. Integer fields carry the `i` suffix so
//! the sink stores them as integers; float and untyped fields are left bare.

use types::catalog::{FieldDescriptor, FieldType};

pub const GATEWAY_BATTERY_FIELD: &str = "gatewayBattery";
pub const SIGNAL_FIELD: &str = "rssi";

const PAYLOAD_TAGS: &str = "deviceName=${payload.deviceName},gatewayName=${payload.gatewayName}";
const ALIASED_TAGS: &str = "deviceName=${deviceName},gatewayName=${gatewayName}";

/// Template for fixed-format struct payloads, read straight off the payload
/// object. Struct fields are integers on the wire unless declared `float`.
/// The gateway attaches its own battery percentage and the link RSSI (both
/// integers) to every struct payload, so both are appended to the declared
/// field list.
pub fn struct_write_syntax(measurement: &str, fields: &[FieldDescriptor]) -> String {
    let mut parts: Vec<String> = fields
        .iter()
        .map(|field| match field.field_type {
            Some(FieldType::Float) => format!("{}=${{payload.{}}}", field.name, field.name),
            _ => format!("{}=${{payload.{}}}i", field.name, field.name),
        })
        .collect();
    parts.push(format!(
        "{GATEWAY_BATTERY_FIELD}=${{payload.{GATEWAY_BATTERY_FIELD}}}i"
    ));
    parts.push(format!("{SIGNAL_FIELD}=${{payload.{SIGNAL_FIELD}}}i"));

    format!("{measurement},{PAYLOAD_TAGS} {}", parts.join(","))
}

/// Template for rules that alias every field in their SELECT/FOREACH list;
/// values are referenced by alias rather than payload path.
pub fn aliased_write_syntax(
    measurement: &str,
    fields: &[FieldDescriptor],
    default_type: FieldType,
) -> String {
    let parts: Vec<String> = fields
        .iter()
        .map(|field| match field.field_type.unwrap_or(default_type) {
            FieldType::Integer => format!("{}=${{{}}}i", field.name, field.name),
            FieldType::Float => format!("{}=${{{}}}", field.name, field.name),
        })
        .collect();

    format!("{measurement},{ALIASED_TAGS} {}", parts.join(","))
}
