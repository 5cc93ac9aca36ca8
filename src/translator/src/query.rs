//! Rule-SQL builders, one shape per parser kind. The generated strings must
//! stay syntactically valid for the broker's rule language.

use types::catalog::FieldDescriptor;

pub const ARRAY_ALIAS: &str = "sample_item";

pub fn select_all(topic: &str) -> String {
    format!("SELECT * FROM \"{topic}\"")
}

/// Plain SELECT with dotted-path aliasing. With `use_jq` the value is pulled
/// out through the jq() SQL function instead of a dotted payload path; jq
/// returns a list, so the first element is taken.
pub fn payload_select(topic: &str, fields: &[FieldDescriptor], use_jq: bool) -> String {
    let mut parts = base_projection();
    for field in fields {
        let path = field.path.as_deref().unwrap_or(&field.name);
        if use_jq {
            parts.push(format!("nth(1, jq('.{path}', payload)) as {}", field.name));
        } else {
            parts.push(format!("payload.{path} as {}", field.name));
        }
    }

    format!("SELECT {} FROM \"{topic}\"", parts.join(", "))
}

/// FOREACH projection over an array path, one output row per element. A field
/// without a path projects the element itself.
pub fn foreach_select(topic: &str, array_path: &str, fields: &[FieldDescriptor]) -> String {
    let mut parts = base_projection();
    for field in fields {
        match field.path.as_deref() {
            Some(path) => parts.push(format!("{ARRAY_ALIAS}.{path} as {}", field.name)),
            None => parts.push(format!("{ARRAY_ALIAS} as {}", field.name)),
        }
    }

    format!(
        "FOREACH payload.{array_path} as {ARRAY_ALIAS} DO {} FROM \"{topic}\"",
        parts.join(", ")
    )
}

fn base_projection() -> Vec<String> {
    vec![
        "payload.deviceName as deviceName".to_owned(),
        "payload.gatewayName as gatewayName".to_owned(),
    ]
}

#[cfg(test)]
mod tests {
    use types::catalog::FieldDescriptor;

    use super::{foreach_select, payload_select, select_all};

    fn field(name: &str, path: Option<&str>) -> FieldDescriptor {
        FieldDescriptor {
            name: name.to_owned(),
            path: path.map(str::to_owned),
            field_type: None,
        }
    }

    #[test]
    fn test_select_all() {
        assert_eq!(select_all("ble/st/acc"), "SELECT * FROM \"ble/st/acc\"");
    }

    #[test]
    fn test_payload_select_aliases_dotted_paths() {
        let fields = vec![field("average", Some("Body.average")), field("hr", None)];
        let sql = payload_select("ble/ms/hr", &fields, false);
        assert_eq!(
            sql,
            "SELECT payload.deviceName as deviceName, payload.gatewayName as gatewayName, \
             payload.Body.average as average, payload.hr as hr FROM \"ble/ms/hr\""
        );
    }

    #[test]
    fn test_payload_select_jq_mode() {
        let fields = vec![field("average", Some("Body.average"))];
        let sql = payload_select("ble/ms/hr", &fields, true);
        assert!(sql.contains("nth(1, jq('.Body.average', payload)) as average"));
    }

    #[test]
    fn test_foreach_select() {
        let fields = vec![field("temp", Some("t")), field("sample", None)];
        let sql = foreach_select("ble/ms/ecg", "samples", &fields);
        assert!(sql.starts_with("FOREACH payload.samples as sample_item DO "));
        assert!(sql.contains("sample_item.t as temp"));
        assert!(sql.contains("sample_item as sample"));
        assert!(sql.ends_with("FROM \"ble/ms/ecg\""));
    }
}
