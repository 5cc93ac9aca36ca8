//! Request bodies for the broker's `/api/v5` management endpoints.

use serde::Serialize;
use serde_json::{Map, Value};

pub const ACTION_TYPE: &str = "influxdb";

#[derive(Debug, Serialize)]
pub struct CreateActionReq {
    pub connector: String,
    pub description: String,
    pub enable: bool,
    pub name: String,
    pub parameters: ActionParameters,
    pub resource_opts: ResourceOpts,
    #[serde(rename = "type")]
    pub action_type: String,
}

#[derive(Debug, Serialize)]
pub struct ActionParameters {
    pub precision: String,
    pub write_syntax: String,
}

#[derive(Debug, Serialize)]
pub struct ResourceOpts {
    pub health_check_interval: String,
}

/// Rule body for both create and update. The broker rejects an `id` on
/// update, so it is only serialized when present.
#[derive(Debug, Serialize)]
pub struct RuleReq {
    pub sql: String,
    pub actions: Vec<String>,
    pub description: String,
    pub enable: bool,
    pub metadata: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use serde_json::Map;

    use super::RuleReq;

    #[test]
    fn test_rule_req_id_skipped_when_absent() {
        let mut req = RuleReq {
            sql: "SELECT * FROM \"t\"".to_owned(),
            actions: vec!["influxdb:action_x".to_owned()],
            description: "desc".to_owned(),
            enable: true,
            metadata: Map::new(),
            id: None,
            name: "rule_x".to_owned(),
        };
        let v = serde_json::to_value(&req).unwrap();
        assert!(v.get("id").is_none());

        req.id = Some("rule_id_x".to_owned());
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["id"], "rule_id_x");
        assert_eq!(v["actions"][0], "influxdb:action_x");
    }
}
